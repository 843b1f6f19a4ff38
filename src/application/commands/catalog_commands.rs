//! Author / Publisher Commands

#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CreatePublisher {
    pub name: String,
}
