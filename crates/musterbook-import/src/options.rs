/// Options that control how free text is turned into a roster.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Roster name used when the text has no non-blank line.
    pub default_name: String,
    /// Fall back to the cross-faction manifestation lores when the faction's
    /// own lores are not named.
    pub universal_manifestation_lores: bool,
    /// Mark the imported roster as set up so it opens straight into editing.
    pub mark_setup_complete: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            default_name: "Imported List".to_string(),
            universal_manifestation_lores: true,
            mark_setup_complete: true,
        }
    }
}
