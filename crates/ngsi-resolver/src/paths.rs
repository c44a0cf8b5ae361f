//! Project anchoring and relative import paths.

use camino::{Utf8Path, Utf8PathBuf};

/// Finds the stable project anchor for a base directory.
///
/// Walks upward from `base` until a directory carrying a `package.json`
/// or a `src` folder is found. Alias targets are stored relative to this
/// anchor so the trie survives `base_url` pointing below the project
/// root. Falls back to `base` itself when no marker exists.
#[must_use]
pub fn project_anchor(base: &Utf8Path) -> Utf8PathBuf {
    let mut current = Some(base);
    while let Some(dir) = current {
        if dir.join("package.json").is_file() || dir.join("src").is_dir() {
            return dir.to_owned();
        }
        current = dir.parent();
    }
    base.to_owned()
}

/// Removes a trailing TypeScript source extension.
///
/// Resolution targets normally arrive extension-free, and a dotted entity
/// basename like `button.component` is part of the module path and must
/// survive. Only the literal `.d.ts` and `.ts` suffixes are stripped.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use ngsi_resolver::strip_source_extension;
///
/// assert_eq!(strip_source_extension(Utf8Path::new("src/app/button.component.ts")).as_str(), "src/app/button.component");
/// assert_eq!(strip_source_extension(Utf8Path::new("src/app/button.component")).as_str(), "src/app/button.component");
/// ```
#[must_use]
pub fn strip_source_extension(path: &Utf8Path) -> Utf8PathBuf {
    let raw = path.as_str();
    let stripped = raw
        .strip_suffix(".d.ts")
        .or_else(|| raw.strip_suffix(".ts"))
        .unwrap_or(raw);
    Utf8PathBuf::from(stripped)
}

/// Computes the relative import path from `current_file` to `target`.
///
/// The result uses forward slashes, drops a trailing `.ts`/`.d.ts` source
/// extension if one is present, and is `./`-prefixed unless it already
/// starts with a dot.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use ngsi_resolver::relative_import;
///
/// let import = relative_import(
///     Utf8Path::new("/proj/src/app/widget.component.ts"),
///     Utf8Path::new("/proj/src/shared/util.ts"),
/// );
/// assert_eq!(import, "../shared/util");
/// ```
#[must_use]
pub fn relative_import(current_file: &Utf8Path, target: &Utf8Path) -> String {
    let from_dir = current_file.parent().unwrap_or(Utf8Path::new(""));
    let target = strip_source_extension(target);

    let from: Vec<&str> = from_dir.components().map(|c| c.as_str()).collect();
    let to: Vec<&str> = target.components().map(|c| c.as_str()).collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(&to[common..]);
    let joined = parts.join("/");

    if joined.starts_with('.') {
        joined
    } else {
        format!("./{joined}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_import_sibling_file() {
        let import = relative_import(
            Utf8Path::new("/proj/src/app/panel.component.ts"),
            Utf8Path::new("/proj/src/app/widget.component.ts"),
        );
        assert_eq!(import, "./widget.component");
    }

    #[test]
    fn test_relative_import_walks_up() {
        let import = relative_import(
            Utf8Path::new("/proj/src/app/deep/nested/panel.component.ts"),
            Utf8Path::new("/proj/src/shared/util.ts"),
        );
        assert_eq!(import, "../../../shared/util");
    }

    #[test]
    fn test_relative_import_into_subdirectory() {
        let import = relative_import(
            Utf8Path::new("/proj/src/app/panel.component.ts"),
            Utf8Path::new("/proj/src/app/widgets/button.component.ts"),
        );
        assert_eq!(import, "./widgets/button.component");
    }

    #[test]
    fn test_relative_import_keeps_dotted_basename() {
        // Targets arrive extension-free; the kind token in the basename
        // is part of the module path, not an extension.
        let import = relative_import(
            Utf8Path::new("/proj/src/app/widget.component"),
            Utf8Path::new("/proj/src/shared/date.pipe"),
        );
        assert_eq!(import, "../shared/date.pipe");
    }

    #[test]
    fn test_strip_source_extension_known_suffixes_only() {
        assert_eq!(
            strip_source_extension(Utf8Path::new("/deps/ui/card/index.d.ts")).as_str(),
            "/deps/ui/card/index"
        );
        assert_eq!(
            strip_source_extension(Utf8Path::new("/proj/src/util.ts")).as_str(),
            "/proj/src/util"
        );
        assert_eq!(
            strip_source_extension(Utf8Path::new("/proj/src/button.component")).as_str(),
            "/proj/src/button.component"
        );
    }

    #[test]
    fn test_project_anchor_finds_src_marker() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
        std::fs::create_dir_all(root.join("src/app")).expect("create dirs");

        assert_eq!(project_anchor(&root.join("src/app")), root);
    }

    #[test]
    fn test_project_anchor_falls_back_to_base() {
        let base = Utf8Path::new("/definitely/not/a/real/dir");
        assert_eq!(project_anchor(base), base);
    }
}
