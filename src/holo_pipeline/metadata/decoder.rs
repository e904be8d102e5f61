use std::path::Path;

use crate::holo_pipeline::common::error::Result;
use crate::holo_pipeline::metadata::record::MetadataRecord;

pub trait FrameDecoder {
    fn decode(&self, path: &Path) -> Result<MetadataRecord>;
}
