//! Registration metadata shared by the wenturc plugins

use std::collections::HashMap;

pub const PLUGIN_ID: &str = "random_images";
pub const AUTHOR: &str = "IGCrystal";
pub const DESCRIPTION: &str = "从 wenturc 获取随机图的插件";
pub const VERSION: &str = "1.1";
pub const REPOSITORY: &str = "https://github.com/IGCrystal/astr_plugin_random_image";

pub fn wenturc_metadata() -> HashMap<String, String> {
    HashMap::from([
        ("id".to_string(), PLUGIN_ID.to_string()),
        ("author".to_string(), AUTHOR.to_string()),
        ("version".to_string(), VERSION.to_string()),
        ("repository".to_string(), REPOSITORY.to_string()),
    ])
}
