pub mod image;
pub mod mime_detect;

pub use self::image::{encode_payload, normalize, prepare, MAX_DIMENSION, PAYLOAD_MIME};
pub use mime_detect::{is_image, sniff_mime};
