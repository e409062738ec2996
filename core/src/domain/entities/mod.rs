pub mod token;

pub use token::{
    Claims, NewRefreshRecord, RefreshCredential, RefreshRecord, TokenPair,
    REFRESH_CREDENTIAL_VERSION, REFRESH_SECRET_LEN,
};
