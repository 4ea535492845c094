//! All-or-nothing PNG emission of a layer set

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::error::{LayerError, Result};
use crate::models::LayerSet;
use crate::render::{RenderOptions, render_layer};

/// File name for layer `index` (0-based) of `total`.
///
/// The pattern is `<prefix>_layer_<i>_of_<n>.png` with a 1-based `i`.
pub fn layer_file_name(prefix: &str, index: usize, total: usize) -> String {
    format!("{prefix}_layer_{}_of_{total}.png", index + 1)
}

/// Render every layer and write them into `dir`.
///
/// All images are rendered before anything touches the filesystem. Files are
/// written under temporary names and only renamed into place once every
/// write succeeded. On failure, whatever this call created is removed, files
/// that were already at the target paths are put back, and the error is
/// returned, so the directory ends up with all `n` new layers or none of them.
pub fn write_layers(
    layers: &LayerSet,
    dir: &Path,
    prefix: &str,
    options: &RenderOptions,
) -> Result<Vec<PathBuf>> {
    let images = layers
        .iter()
        .map(|layer| render_layer(layer, options))
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(dir).map_err(|e| LayerError::io(dir, e))?;

    let total = layers.len();
    let finals: Vec<PathBuf> = (0..total)
        .map(|i| dir.join(layer_file_name(prefix, i, total)))
        .collect();
    let temps: Vec<PathBuf> = finals
        .iter()
        .map(|p| p.with_extension("png.partial"))
        .collect();

    let mut written: Vec<&Path> = Vec::with_capacity(total);
    for (image, temp) in images.iter().zip(&temps) {
        if let Err(err) = image.save_with_format(temp, ImageFormat::Png) {
            // save may leave a truncated file behind
            written.push(temp);
            cleanup(&written);
            return Err(err.into());
        }
        written.push(temp);
    }

    if let Err(err) = commit(&temps, &finals) {
        // Temps already renamed into place are gone; the rest are removed here
        cleanup(&written);
        return Err(err);
    }

    for path in &finals {
        tracing::info!(path = %path.display(), "saved layer");
    }
    Ok(finals)
}

/// Move every temp onto its final path.
///
/// Existing target files are first moved aside to `*.png.previous` and put
/// back if any rename fails. A target that exists but is not a regular file
/// is refused before anything moves.
fn commit(temps: &[PathBuf], finals: &[PathBuf]) -> Result<()> {
    for fin in finals {
        if let Ok(meta) = fs::symlink_metadata(fin) {
            if !meta.is_file() {
                return Err(LayerError::io(
                    fin,
                    io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        "target exists and is not a regular file",
                    ),
                ));
            }
        }
    }

    let mut backups: Vec<(PathBuf, &Path)> = Vec::new();
    for fin in finals {
        if fs::symlink_metadata(fin).is_ok() {
            let backup = fin.with_extension("png.previous");
            if let Err(err) = fs::rename(fin, &backup) {
                restore(&backups);
                return Err(LayerError::io(fin, err));
            }
            backups.push((backup, fin.as_path()));
        }
    }

    let mut renamed: Vec<&Path> = Vec::with_capacity(finals.len());
    for (temp, fin) in temps.iter().zip(finals) {
        if let Err(err) = fs::rename(temp, fin) {
            cleanup(&renamed);
            restore(&backups);
            return Err(LayerError::io(fin, err));
        }
        renamed.push(fin.as_path());
    }

    let stale: Vec<&Path> = backups.iter().map(|(backup, _)| backup.as_path()).collect();
    cleanup(&stale);
    Ok(())
}

fn restore(backups: &[(PathBuf, &Path)]) {
    for (backup, fin) in backups {
        if let Err(err) = fs::rename(backup, fin) {
            tracing::warn!(
                path = %fin.display(),
                backup = %backup.display(),
                error = %err,
                "failed to restore previous layer"
            );
        }
    }
}

fn cleanup(paths: &[&Path]) {
    for path in paths {
        if let Err(err) = fs::remove_file(path) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to remove partial output"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_file_name() {
        assert_eq!(layer_file_name("qr", 0, 5), "qr_layer_1_of_5.png");
        assert_eq!(layer_file_name("vault", 4, 5), "vault_layer_5_of_5.png");
    }

    #[test]
    fn test_commit_restores_previous_files_when_a_rename_fails() {
        let dir = tempfile::tempdir().unwrap();
        let finals = vec![dir.path().join("a.png"), dir.path().join("b.png")];
        let temps = vec![
            dir.path().join("a.png.partial"),
            dir.path().join("b.png.partial"),
        ];
        fs::write(&finals[0], b"old a").unwrap();
        fs::write(&temps[0], b"new a").unwrap();
        // temps[1] is missing, so the second rename fails

        let err = commit(&temps, &finals).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert_eq!(fs::read(&finals[0]).unwrap(), b"old a");
        assert!(!finals[1].exists());

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        // The renamed temp was removed, no backup is left behind
        assert_eq!(names, vec!["a.png"]);
    }

    #[test]
    fn test_commit_replaces_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let finals = vec![dir.path().join("a.png")];
        let temps = vec![dir.path().join("a.png.partial")];
        fs::write(&finals[0], b"old").unwrap();
        fs::write(&temps[0], b"new").unwrap();

        commit(&temps, &finals).unwrap();
        assert_eq!(fs::read(&finals[0]).unwrap(), b"new");
        assert!(!dir.path().join("a.png.previous").exists());
        assert!(!temps[0].exists());
    }

    #[test]
    fn test_commit_refuses_non_file_target() {
        let dir = tempfile::tempdir().unwrap();
        let finals = vec![dir.path().join("a.png")];
        let temps = vec![dir.path().join("a.png.partial")];
        fs::create_dir(&finals[0]).unwrap();
        fs::write(&temps[0], b"new").unwrap();

        assert!(commit(&temps, &finals).is_err());
        assert!(finals[0].is_dir());
        // Untouched: the caller owns temp cleanup
        assert!(temps[0].exists());
    }
}
