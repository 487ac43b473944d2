mod test_utils;


#[cfg(feature = "allow_filesystem")]
mod test_from_yaml;
