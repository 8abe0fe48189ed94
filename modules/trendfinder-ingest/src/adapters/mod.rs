//! One adapter per source kind. Each returns raw stories; the ingestor's
//! isolation boundary normalizes them and absorbs failures.

pub mod newsletter;
pub mod social;
pub mod website;
