use anyhow::{Context, Result, bail};
use argkit_schema::{DEFAULT_SCHEMA_NAME, ParserSchema};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub path: PathBuf,
    pub schema: ParserSchema,
}

/// Load `path`, or `argkit.json` from the current directory.
pub fn load_schema(path: Option<&Path>) -> Result<LoadedSchema> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let path = match path {
        Some(p) => resolve_against(&cwd, p),
        None => cwd.join(DEFAULT_SCHEMA_NAME),
    };

    if !path.exists() {
        bail!(
            "schema not found: {} (run `argkit init` to create one)",
            path.display()
        );
    }

    tracing::debug!(path = %path.display(), "loading schema");
    let schema = ParserSchema::from_file(&path)
        .with_context(|| format!("failed to load schema: {}", path.display()))?;
    Ok(LoadedSchema { path, schema })
}

pub fn write_default_schema(project_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = project_dir.join(DEFAULT_SCHEMA_NAME);
    if dest.exists() && !overwrite {
        bail!(
            "{} already exists in {}",
            DEFAULT_SCHEMA_NAME,
            project_dir.display()
        );
    }

    // name the sample after the directory; `.` and `..` resolve to real names
    let mut schema = ParserSchema::sample();
    let resolved = fs::canonicalize(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
    if let Some(name) = resolved.file_name().and_then(|s| s.to_str()) {
        schema.name = name.to_string();
    }

    let mut out = serde_json::to_string_pretty(&schema).context("failed to serialize schema")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if overwrite && dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;
    Ok(dest)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("argkit-{prefix}-{pid}-{nanos}"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_schema_round_trips() {
        let dir = make_temp_dir("schema").join("demo-tool");
        fs::create_dir_all(&dir).unwrap();

        let path = write_default_schema(&dir, false).unwrap();
        assert_eq!(path, dir.join(DEFAULT_SCHEMA_NAME));
        assert!(!dir.join("argkit.tmp").exists());

        let loaded = load_schema(Some(&path)).unwrap();
        assert_eq!(loaded.schema.name, "demo-tool");
        assert!(loaded.schema.build().is_ok());

        let _ = fs::remove_dir_all(dir.parent().unwrap());
    }

    #[test]
    fn relative_components_resolve_to_the_directory_name() {
        let dir = make_temp_dir("resolve").join("named-tool");
        fs::create_dir_all(dir.join("inner")).unwrap();

        let path = write_default_schema(&dir.join("inner").join(".."), false).unwrap();
        let loaded = load_schema(Some(&path)).unwrap();
        assert_eq!(loaded.schema.name, "named-tool");

        let _ = fs::remove_dir_all(dir.parent().unwrap());
    }

    #[test]
    fn refuses_to_overwrite_without_flag() {
        let dir = make_temp_dir("overwrite");
        write_default_schema(&dir, false).unwrap();
        assert!(write_default_schema(&dir, false).is_err());
        assert!(write_default_schema(&dir, true).is_ok());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_schema_is_an_error() {
        let dir = make_temp_dir("missing");
        let err = load_schema(Some(&dir.join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("schema not found"), "{err}");
        let _ = fs::remove_dir_all(&dir);
    }
}
