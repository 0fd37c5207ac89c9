mod command;
mod handler;
mod result;

pub use command::ImportGuardiansCommand;
pub use handler::ImportGuardiansHandler;
pub use result::ImportGuardiansResult;
