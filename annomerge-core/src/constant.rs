// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// Image extensions retained when flattening contributor archives
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

// Team size bounds for a single merge
pub const MIN_MEMBERS: usize = 2;
pub const MAX_MEMBERS: usize = 4;

// Default output layout
pub const DEFAULT_OUT_DIR: &str = "Merger";
pub const INDIVIDUALS_DIR: &str = "Individuals";
pub const TEMP_DIR: &str = "Temp";
pub const MERGED_JSON: &str = "merged_input.json";
pub const MERGED_ARCHIVE: &str = "merged_images.zip";

// Environment variable overriding the default output directory
pub const OUT_DIR_ENV: &str = "ANNOMERGE_OUT_DIR";

// Prefix of the scoped extraction area created next to the image directory
pub const UNZIP_TMP_PREFIX: &str = "_unzips_tmp";

// Read buffer used when digesting image files
pub const DIGEST_BUFFER_SIZE: usize = 1 << 20;

// Hex characters kept from a digest for disambiguating renamed images
pub const RENAME_DIGEST_LENGTH: usize = 8;

// Hex characters kept from a digest for synthesized result identifiers
pub const RESULT_DIGEST_LENGTH: usize = 6;

// JSON keys that identify a COCO document and its image file names
pub const COCO_IMAGES_KEY: &str = "images";
pub const COCO_FILE_NAME_KEY: &str = "file_name";
