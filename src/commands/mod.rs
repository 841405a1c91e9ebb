pub mod apply;
pub mod command;
pub mod decode;
pub mod plugin;

pub type CmdResult<T> = pathpipe::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}
