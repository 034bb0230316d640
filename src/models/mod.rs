pub mod api_credential;
pub mod settings;

pub use api_credential::*;
pub use settings::*;
