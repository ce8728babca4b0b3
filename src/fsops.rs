//! Copy, link and directory primitives shared by every assembly stage.
//!
//! Each primitive returns a plain `io::Result`; the assembler decides whether
//! a failure aborts the run or is recorded and skipped. Every operation is
//! echoed at info level so long copy runs stay observable.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::info;
use same_file::is_same_file;

/// Create a directory and any missing parents.
pub fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.is_dir() {
        info!("mkdir -p {}", dir.display());
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Install a single file at an exact destination path.
///
/// A destination already pointing at the same inode as the source is left
/// alone. New installations try a hard link first and fall back to a byte
/// copy across filesystems.
pub fn install_file(source: &Path, destination: &Path) -> std::io::Result<()> {
    if destination.exists() {
        if is_same_file(source, destination)? {
            return Ok(());
        }
        fs::remove_file(destination)?;
    }

    info!("install {} -> {}", source.display(), destination.display());
    match fs::hard_link(source, destination) {
        Ok(_) => Ok(()),
        Err(err) => {
            if err.kind() == ErrorKind::AlreadyExists {
                Ok(())
            } else {
                fs::copy(source, destination).map(|_| ())
            }
        }
    }
}

/// Install a file or directory into a destination directory under its own
/// base name. Directories are copied recursively.
pub fn install_into(source: &Path, dest_dir: &Path) -> std::io::Result<()> {
    let name = source.file_name().ok_or_else(|| {
        std::io::Error::new(
            ErrorKind::InvalidInput,
            format!("source path has no file name: {}", source.display()),
        )
    })?;
    let destination = dest_dir.join(name);
    if source.is_dir() {
        copy_dir_recursive(source, &destination)
    } else {
        install_file(source, &destination)
    }
}

/// Recursively copy a directory tree.
pub fn copy_dir_recursive(source: &Path, destination: &Path) -> std::io::Result<()> {
    ensure_dir(destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            install_file(&entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Create a relative symlink `link -> ./{target_name}`, replacing any
/// existing entry at the link path. This preserves the versioned shared
/// library convention where `libfoo.so` resolves to a sibling
/// `libfoo.so.{version}`.
#[cfg(unix)]
pub fn relative_symlink(target_name: &str, link: &Path) -> std::io::Result<()> {
    if link.symlink_metadata().is_ok() {
        fs::remove_file(link)?;
    }
    info!("ln -s ./{} {}", target_name, link.display());
    std::os::unix::fs::symlink(format!("./{target_name}"), link)
}

/// Non-unix fallback: install a copy under the link name. The versioned
/// shared library convention only matters for the unix outputs.
#[cfg(not(unix))]
pub fn relative_symlink(target_name: &str, link: &Path) -> std::io::Result<()> {
    let dir = link.parent().ok_or_else(|| {
        std::io::Error::new(ErrorKind::InvalidInput, "link path has no parent")
    })?;
    install_file(&dir.join(target_name), link)
}
