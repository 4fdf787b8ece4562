mod store;

pub use store::{PhotoStore, image_mime, original_name};
