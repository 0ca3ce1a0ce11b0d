//! Font discovery for the PDF handout.
//!
//! The handout uses the Roboto family.  The files are looked up in
//! `$DECKGEN_FONTS_DIR`, then `assets/fonts` next to the executable, then
//! `assets/fonts` in the crate directory.  When none of these holds the
//! complete family, the Windows Arial family is tried from
//! `$DECKGEN_WINDOWS_FONTS_DIR` or `%WINDIR%\Fonts`.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the preferred font family.
pub const FONT_FAMILY_NAME: &str = "Roboto";

/// Overrides the directory searched first for the Roboto files.
pub const FONTS_DIR_VAR: &str = "DECKGEN_FONTS_DIR";

/// Overrides the directory holding the Arial fallback.
pub const WINDOWS_FONTS_DIR_VAR: &str = "DECKGEN_WINDOWS_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

const FALLBACK_FAMILY_NAME: &str = "Arial";

/// Arial files in regular, bold, italic and bold-italic order.
const FALLBACK_FILES: [(&str, &str); 4] = [
    ("arial.ttf", "regular"),
    ("arialbd.ttf", "bold"),
    ("ariali.ttf", "italic"),
    ("arialbi.ttf", "bold italic"),
];

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
}

fn search_directories() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = env_path(FONTS_DIR_VAR).into_iter().collect();

    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets/fonts")));
    let in_manifest = Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"));

    for candidate in [beside_exe, in_manifest].into_iter().flatten() {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

fn missing_files(directory: &Path) -> Vec<&'static str> {
    FONT_FILES
        .iter()
        .copied()
        .filter(|name| !directory.join(name).is_file())
        .collect()
}

fn resolve_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in search_directories() {
        if !candidate.is_dir() {
            attempts.push(format!("{} (no such directory)", candidate.display()));
            continue;
        }
        let missing = missing_files(&candidate);
        if missing.is_empty() {
            debug!("using fonts from {}", candidate.display());
            return Ok(candidate);
        }
        attempts.push(format!(
            "{} (missing {})",
            candidate.display(),
            missing.join(", ")
        ));
    }

    Err(Error::new(
        format!(
            "{FONT_FAMILY_NAME} fonts not found; checked {}. Set {FONTS_DIR_VAR} to a directory with {}",
            attempts.join(", "),
            FONT_FILES.join(", ")
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

fn load_preferred_family() -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_directory()?;
    fonts::from_files(&directory, FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "failed to load {FONT_FAMILY_NAME} from {}: {err}",
                directory.display()
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn windows_directory() -> Option<PathBuf> {
    if let Some(path) = env_path(WINDOWS_FONTS_DIR_VAR) {
        return Some(path);
    }
    ["WINDIR", "SystemRoot"]
        .into_iter()
        .filter_map(env_path)
        .map(|root| root.join("Fonts"))
        .find(|candidate| candidate.is_dir())
}

fn load_fallback_font(directory: &Path, (file, style): (&str, &str)) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!(
                "failed to load {FALLBACK_FAMILY_NAME} {style} at {}: {err}",
                path.display()
            ),
            io::Error::new(kind, err.to_string()),
        )
    })
}

fn load_fallback_family() -> Result<FontFamily<FontData>, Error> {
    let directory = windows_directory().ok_or_else(|| {
        Error::new(
            format!("no {FALLBACK_FAMILY_NAME} directory; set {WINDOWS_FONTS_DIR_VAR}"),
            io::Error::new(io::ErrorKind::NotFound, "windows fonts directory not found"),
        )
    })?;
    let [regular, bold, italic, bold_italic] = FALLBACK_FILES;
    Ok(FontFamily {
        regular: load_fallback_font(&directory, regular)?,
        bold: load_fallback_font(&directory, bold)?,
        italic: load_fallback_font(&directory, italic)?,
        bold_italic: load_fallback_font(&directory, bold_italic)?,
    })
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if matches!(io_err.kind(), io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied)
    )
}

/// Loads the handout font family, falling back to Arial when Roboto is absent.
pub fn font_family() -> Result<FontFamily<FontData>, Error> {
    match load_preferred_family() {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => match load_fallback_family() {
            Ok(fallback) => {
                warn!("{err}; falling back to {FALLBACK_FAMILY_NAME}");
                Ok(fallback)
            }
            Err(fallback_err) => {
                warn!("{err}; {FALLBACK_FAMILY_NAME} fallback failed: {fallback_err}");
                Err(Error::new(
                    format!("no usable handout fonts: {err}; {fallback_err}"),
                    io::Error::new(io::ErrorKind::NotFound, "handout fonts are not available"),
                ))
            }
        },
        Err(err) => Err(err),
    }
}

/// Returns whether a handout can be rendered with the fonts on this machine.
pub fn fonts_available() -> bool {
    resolve_directory().is_ok()
        || windows_directory().is_some_and(|dir| {
            FALLBACK_FILES
                .iter()
                .all(|(file, _)| dir.join(file).is_file())
        })
}
