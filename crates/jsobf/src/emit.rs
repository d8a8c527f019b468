use crate::obfuscate::Artifact;

use anyhow::{Context, Result};

use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

/// The fixed runtime prologue. Binds the UTF-8 decoder, the shared
/// RSA-OAEP algorithm descriptor, the ambient global object and the
/// WebCrypto decrypt/importKey entry points to one-letter names the
/// per-literal decode declarations refer to. The wire format is fixed:
/// artifacts decode through the browser's `crypto.subtle`.
pub const BOOTSTRAP: &str = "'use strict';(async function(){\
const _D=new TextDecoder('utf-8');\
const D=_D.decode.bind(_D),\
O={name:\"RSA-OAEP\",hash:\"SHA-256\"},\
J='jwk',F=false,W=window,Y=[\"decrypt\"],U=Uint8Array,\
T=crypto.subtle.decrypt.bind(crypto.subtle),\
V=crypto.subtle.importKey.bind(crypto.subtle);";

pub const EPILOGUE: &str = "})();";

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Concatenates bootstrap, accumulated declarations and the rewritten
/// body into one self-invoking strict-mode async program. Declaration
/// order inside the preamble already respects first use, so the result
/// needs no forward references.
pub fn assemble(artifact: &Artifact) -> String {
    format!("{}{}{}{}", BOOTSTRAP, artifact.preamble, artifact.body, EPILOGUE)
}

/// Derives the output path by inserting `.obf` before the input
/// extension: `app.js` becomes `app.obf.js`.
pub fn derive_output_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) => input.with_extension(format!("obf.{}", ext.to_string_lossy())),
        None => input.with_extension("obf"),
    }
}

pub fn write_artifact(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write artifact to {}", path.display()))
}

/// Runs the minifier collaborator over the written artifact and rewrites
/// it in place. Minification is recoverable: on failure the un-minified
/// file already on disk stays the final result and the error only gets
/// logged.
pub fn finalize<F>(path: &Path, minify: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<String>,
{
    match minify(path) {
        Ok(data) => write_artifact(path, &data),
        Err(e) => {
            eprintln!(
                "warning: minification of {} failed, keeping the un-minified artifact: {:#}",
                path.display(),
                e
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::{read_to_string, write};
    use tempfile::tempdir;

    #[test]
    fn test_assemble_order() {
        let artifact = Artifact {
            preamble: "const a = 1;".to_string(),
            body: "use(a);".to_string(),
        };
        let text = assemble(&artifact);
        assert!(text.starts_with(BOOTSTRAP));
        assert!(text.ends_with("const a = 1;use(a);})();"));
    }

    #[test]
    fn test_bootstrap_is_strict_and_async() {
        assert!(BOOTSTRAP.starts_with("'use strict';(async function(){"));
        assert!(BOOTSTRAP.ends_with(";"));
    }

    #[test]
    fn test_derive_output_path() {
        assert_eq!(
            derive_output_path(Path::new("dir/app.js")),
            PathBuf::from("dir/app.obf.js")
        );
        assert_eq!(
            derive_output_path(Path::new("script")),
            PathBuf::from("script.obf")
        );
    }

    #[test]
    fn test_finalize_rewrites_on_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.obf.js");
        write(&path, "original  text").unwrap();

        finalize(&path, |_| Ok("minified".to_string())).unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "minified");
    }

    #[test]
    fn test_finalize_failure_keeps_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.obf.js");
        write(&path, "assembled text").unwrap();

        finalize(&path, |_| Err(anyhow::anyhow!("minifier broke"))).unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "assembled text");
    }
}
