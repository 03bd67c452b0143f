#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Token that separates dumps printed on the same line.
    pub separator: String,
    /// Segments of at most this many characters are ignored.
    pub min_len: usize,
    /// Producer program followed by its arguments.
    pub command: Vec<String>,
}
impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            separator: " 0 ".to_owned(),
            min_len: 20,
            command: Vec::new(),
        }
    }
}
impl MonitorConfig {
    /// The emulator binary in the working directory.
    pub fn avocado() -> Self {
        Self {
            command: vec!["./avocado".to_owned()],
            ..Default::default()
        }
    }
}
