#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub extract_options: Option<ExtractOptions>,
    pub dry_run: Option<bool>,
}
