//! Object store DTOs

use serde::{Deserialize, Serialize};

/// Response to an object upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedObject {
    pub location: String,
}
