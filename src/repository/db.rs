#[derive(Clone, Debug, Default)]
pub struct Repository {}

impl Repository {
    pub fn new() -> Self {
        Repository {}
    }
}
