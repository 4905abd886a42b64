// Claves de localStorage. Solo SessionManager las usa.
pub const STORAGE_KEY_ID_TOKEN: &str = "id_token";
pub const STORAGE_KEY_ACCESS_TOKEN: &str = "access_token";
/// Clave legacy de los primeros borradores del login local
pub const STORAGE_KEY_LEGACY_DEMO_TOKEN: &str = "demo_token";
pub const STORAGE_KEY_PROVENANCE: &str = "auth_provenance";

/// Todas las claves que el logout debe borrar
pub const SESSION_KEYS: [&str; 4] = [
    STORAGE_KEY_ID_TOKEN,
    STORAGE_KEY_ACCESS_TOKEN,
    STORAGE_KEY_LEGACY_DEMO_TOKEN,
    STORAGE_KEY_PROVENANCE,
];

// Rutas del SPA
pub const ROUTE_LOGIN: &str = "/login";
pub const ROUTE_CALLBACK: &str = "/callback";
pub const ROUTE_PORTAL: &str = "/portal";

/// Máximo de eventos que se mantienen en el feed
pub const MAX_FEED_EVENTS: usize = 100;

/// Evento DOM que dispara un re-render al cambiar de ruta
pub const ROUTE_CHANGE_EVENT: &str = "routechange";
