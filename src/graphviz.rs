use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::config::{OutputOptions, RenderFormat};

const DOT_BINARY: &str = if cfg!(windows) { "dot.exe" } else { "dot" };

/// Image written next to the DOT file, with the format's extension.
pub fn image_path(dot_path: &Path, format: RenderFormat) -> Option<PathBuf> {
    format.extension().map(|ext| dot_path.with_extension(ext))
}

/// Explicit override if given, otherwise the first `dot` on `PATH`.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.is_file().then(|| path.to_path_buf());
    }
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(DOT_BINARY))
        .find(|candidate| candidate.is_file())
}

/// Runs Graphviz on an already written DOT file. Rendering is best-effort:
/// a missing binary or a failing run is reported and yields `None`.
pub fn render(dot_path: &Path, options: &OutputOptions) -> Option<PathBuf> {
    let format = options.render.extension()?;
    let image = image_path(dot_path, options.render)?;
    let Some(binary) = locate(options.graphviz.as_deref()) else {
        warn!("graphviz `dot` not found; skipping {format} rendering");
        return None;
    };

    debug!(binary = %binary.display(), engine = %options.engine, "running graphviz");
    let output = Command::new(&binary)
        .arg(format!("-K{}", options.engine))
        .arg(format!("-T{format}"))
        .arg(dot_path)
        .arg("-o")
        .arg(&image)
        .output();

    match output {
        Ok(out) if out.status.success() => {
            info!(path = %image.display(), "rendered image");
            Some(image)
        }
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr);
            warn!(status = %out.status, stderr = %stderr.trim(), "graphviz rendering failed");
            None
        }
        Err(e) => {
            warn!("failed to run {}: {e}", binary.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn image_path_swaps_extension() {
        let dot = Path::new("out/reachability_view.dot");
        assert_eq!(
            image_path(dot, RenderFormat::Svg),
            Some(PathBuf::from("out/reachability_view.svg"))
        );
        assert_eq!(
            image_path(dot, RenderFormat::Png),
            Some(PathBuf::from("out/reachability_view.png"))
        );
        assert_eq!(image_path(dot, RenderFormat::None), None);
    }

    #[test]
    fn explicit_binary_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(locate(Some(&dir.path().join("no-such-dot"))), None);
    }

    #[test]
    fn explicit_binary_is_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("dot");
        std::fs::write(&fake, "").unwrap();
        assert_eq!(locate(Some(&fake)), Some(fake));
    }

    #[test]
    fn missing_binary_skips_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let dot = dir.path().join("view.dot");
        std::fs::write(&dot, "digraph { a }").unwrap();
        let options = OutputOptions {
            render: RenderFormat::Svg,
            graphviz: Some(dir.path().join("missing")),
            ..OutputOptions::default()
        };
        assert_eq!(render(&dot, &options), None);
        assert!(!dir.path().join("view.svg").exists());
    }

    #[test]
    fn no_format_means_no_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let dot = dir.path().join("view.dot");
        assert_eq!(render(&dot, &OutputOptions::default()), None);
    }
}
