mod listing_service;

pub use listing_service::{
    BrowseListings, CreateListingInput, ListingPageView, ListingService, UpdateListingInput,
};
