use std::collections::BTreeMap;

/// Points in the publish workflow where a user script can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    BeforePublish,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::BeforePublish => "before-publish",
        }
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    pub hook_type: HookType,
    /// Module name from the manifest
    pub module: String,
    /// Version about to be published
    pub version: String,
    /// Branch being published from
    pub branch: String,
    /// Tag the published version will receive
    pub tag: String,
}

impl HookContext {
    /// Convert context to environment variables for the hook script
    ///
    /// Maps context fields to MODULE_RELEASE_* environment variables
    pub fn to_env_vars(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();

        env.insert("MODULE_RELEASE_HOOK".to_string(), self.hook_type.name().to_string());
        env.insert("MODULE_RELEASE_NAME".to_string(), self.module.clone());
        env.insert("MODULE_RELEASE_VERSION".to_string(), self.version.clone());
        env.insert("MODULE_RELEASE_BRANCH".to_string(), self.branch.clone());
        env.insert("MODULE_RELEASE_TAG".to_string(), self.tag.clone());

        env
    }
}
