//! Portfolio CMS backend: credential-chain login, dynamically-expiring
//! sessions, and the content CRUD behind the public site. The server
//! binary wires the HTTP surface; clients embed [`services::monitor`]
//! to track a session's computed expiry.

pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod util;

pub mod models {
    pub mod contact;
    pub mod pagination;
    pub mod post;
    pub mod principal;
    pub mod profile;
    pub mod project;
    pub mod session;
    pub mod settings;
    pub mod statistic;
    pub mod testimonial;
    pub mod user;
}

pub mod repositories {
    pub mod contact;
    pub mod post;
    pub mod profile;
    pub mod project;
    pub mod settings;
    pub mod statistic;
    pub mod testimonial;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod monitor;
    pub mod session;
    pub mod settings;
}

pub mod handlers {
    pub mod auth;
    pub mod contact;
    pub mod dashboard;
    pub mod posts;
    pub mod profile;
    pub mod projects;
    pub mod settings;
    pub mod statistics;
    pub mod testimonials;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod rate_limit;
}

pub mod validation {
    pub mod auth;
    pub mod settings;
}
