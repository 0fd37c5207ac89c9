pub mod import_guardians;

pub use import_guardians::{ImportGuardiansCommand, ImportGuardiansHandler, ImportGuardiansResult};
