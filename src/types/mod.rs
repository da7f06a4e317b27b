// Good News client shared type definitions
// Records exchanged with the backend, client settings, and error taxonomy.

pub mod article;
pub mod comment;
pub mod errors;
pub mod settings;
