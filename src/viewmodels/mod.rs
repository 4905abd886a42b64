pub mod login_viewmodel;
pub mod portal_viewmodel;

pub use login_viewmodel::{LoginViewModel, StatusMessage};
pub use portal_viewmodel::PortalViewModel;
