//! Domain services: authentication, verification codes, OAuth state, and
//! the recommendation generator.

pub mod auth;
pub mod qq;
pub mod recommend;
pub mod verification;
