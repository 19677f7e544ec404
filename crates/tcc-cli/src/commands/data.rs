use std::path::{Path, PathBuf};

use tcc_session::Command;

use super::Context;

pub fn export(ctx: &Context, output: Option<&Path>, stdout: bool) -> Result<(), String> {
    let mut session = super::open_session(ctx);

    if stdout {
        let doc = session.export().map_err(|e| e.to_string())?;
        println!("{}", doc.contents);
        return Ok(());
    }

    super::execute(
        ctx,
        &mut session,
        Command::Export {
            path: output.map(Path::to_path_buf),
        },
    )
}

pub fn import(ctx: &Context, file: &Path) -> Result<(), String> {
    let mut session = super::open_session(ctx);
    super::execute(
        ctx,
        &mut session,
        Command::Import {
            path: PathBuf::from(file),
        },
    )
}

pub fn reset(ctx: &Context) -> Result<(), String> {
    let mut session = super::open_session(ctx);
    super::execute(ctx, &mut session, Command::Reset)
}
