use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Almacén clave/valor de strings con la semántica de `localStorage`
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove_item(&self, key: &str) -> Result<(), String>;
}

/// localStorage del navegador (scope: origin)
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
pub fn get_local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        get_local_storage()?.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        let storage = get_local_storage().ok_or("No se pudo acceder a localStorage")?;
        storage
            .set_item(key, value)
            .map_err(|_| format!("Error guardando '{}' en localStorage", key))
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        let storage = get_local_storage().ok_or("No se pudo acceder a localStorage")?;
        storage
            .remove_item(key)
            .map_err(|_| format!("Error eliminando '{}' de localStorage", key))
    }
}

/// Almacén en memoria. Los clones comparten los mismos datos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
