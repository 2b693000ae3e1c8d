mod image_set;
mod listing_service_impl;
mod policy;
mod status_transitions;
mod url_resolver;

pub use image_set::ImageSetManager;
pub use listing_service_impl::{ListingServiceBuilder, ListingServiceImpl};
pub use policy::*;
pub use status_transitions::{StatusTransitionEngine, TransitionPlan};
pub use url_resolver::ImageUrlResolver;
