pub mod app;
pub mod config;
pub mod cookies;
pub mod db;
pub mod error;
pub mod state;
pub mod templates;

pub mod crypto {
    pub mod password;
    pub mod token;
}

pub mod models {
    pub mod flash;
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod session;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod session;
}

pub mod handlers {
    pub mod auth;
    pub mod pages;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}
