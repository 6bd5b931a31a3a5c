pub mod error;
pub mod header;
pub mod reader;

pub use error::{IdxError, PackageKind};
pub use header::{read_image_header, read_label_header, ImageHeader, LabelHeader};
pub use reader::{load_image_and_label_data, one_hot, read_images, read_labels, unique_labels};
