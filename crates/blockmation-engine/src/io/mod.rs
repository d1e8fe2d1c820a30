pub mod format;

pub use format::{FormatError, HeaderField, parse_model, to_text};

use crate::models::Model;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extension every saved movie file carries
pub const MOVIE_EXTENSION: &str = "txt";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid movie file: {0}")]
    Format(#[from] FormatError),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a movie from any byte source
pub fn load<R: Read>(mut source: R) -> Result<Model, LoadError> {
    let mut bytes = Vec::new();
    source.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes).map_err(|_| FormatError::InvalidEncoding)?;
    Ok(parse_model(&text)?)
}

/// Write a movie to any byte sink
pub fn save<W: Write>(mut destination: W, model: &Model) -> Result<(), SaveError> {
    destination.write_all(to_text(model).as_bytes())?;
    destination.flush()?;
    Ok(())
}

/// Load a movie file from disk
pub fn load_file(path: &Path) -> Result<Model, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let model = load(BufReader::new(file))?;
    log::info!(
        "Loaded {} frames of {}x{} from {}",
        model.total_frames(),
        model.dimensions(),
        model.dimensions(),
        path.display()
    );
    Ok(model)
}

/// Save a movie file to disk, returning the path actually written.
///
/// `.txt` is appended when `path` does not already end in it. The movie is
/// written to a temporary file beside the destination and renamed into
/// place, so a failed save leaves any previous file untouched.
pub fn save_file(path: &Path, model: &Model) -> Result<PathBuf, SaveError> {
    let path = with_movie_extension(path);

    // Create parent directories if they don't exist
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    save(BufWriter::new(temp.as_file_mut()), model)?;
    temp.as_file().sync_all()?;
    temp.persist(&path).map_err(|err| SaveError::Io(err.error))?;

    log::info!(
        "Saved {} frames to {}",
        model.total_frames(),
        path.display()
    );
    Ok(path)
}

/// Append the movie extension unless the path already has it
pub fn with_movie_extension(path: &Path) -> PathBuf {
    if path
        .extension()
        .is_some_and(|extension| extension == MOVIE_EXTENSION)
    {
        return path.to_path_buf();
    }

    let mut with_extension = path.as_os_str().to_os_string();
    with_extension.push(".");
    with_extension.push(MOVIE_EXTENSION);
    PathBuf::from(with_extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Block;
    use crate::tests::{create_test_file, create_test_movie_dir, patterned_movie};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_load_from_reader() {
        let source = "1\n3\nlll\nlrl\nlll".as_bytes();

        let model = load(source).unwrap();

        assert_eq!(model.total_frames(), 1);
        assert_eq!(model.frame(0).unwrap().block(1, 1).unwrap(), Block::Red);
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let result = load(&[b'1', b'\n', 0xff, 0xfe][..]);
        assert!(matches!(
            result,
            Err(LoadError::Format(FormatError::InvalidEncoding))
        ));
    }

    #[test]
    fn test_format_and_io_errors_are_distinct() {
        let result = load("abc\n3\nlll\nlll\nlll".as_bytes());
        assert!(matches!(result, Err(LoadError::Format(_))));

        let movie_dir = create_test_movie_dir();
        let result = load_file(&movie_dir.path().join("missing.txt"));
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_save_to_writer() {
        let mut buffer = Vec::new();

        save(&mut buffer, &patterned_movie(2, 1)).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "1\n2\nlr\ndg");
    }

    #[test]
    fn test_save_and_load_file() {
        let movie_dir = create_test_movie_dir();
        let model = patterned_movie(5, 4);

        let written = save_file(&movie_dir.path().join("walk.txt"), &model).unwrap();

        assert_eq!(written, movie_dir.path().join("walk.txt"));
        assert_eq!(load_file(&written).unwrap(), model);
    }

    #[test]
    fn test_save_file_appends_extension() {
        let movie_dir = create_test_movie_dir();

        let written = save_file(&movie_dir.path().join("walk"), &patterned_movie(2, 1)).unwrap();

        assert_eq!(written, movie_dir.path().join("walk.txt"));
        assert!(written.exists());
        assert!(!movie_dir.path().join("walk").exists());
    }

    #[test]
    fn test_save_file_creates_parent_directories() {
        let movie_dir = create_test_movie_dir();
        let path = movie_dir.path().join("folder/subfolder/walk.txt");

        save_file(&path, &patterned_movie(3, 2)).unwrap();

        assert_eq!(load_file(&path).unwrap(), patterned_movie(3, 2));
    }

    #[test]
    fn test_save_file_overwrites_existing() {
        let movie_dir = create_test_movie_dir();
        let path = create_test_file(&movie_dir, "walk.txt", "1\n1\nb");

        save_file(&path, &patterned_movie(4, 3)).unwrap();

        assert_eq!(load_file(&path).unwrap(), patterned_movie(4, 3));
    }

    #[test]
    fn test_failed_save_leaves_no_partial_file() {
        let movie_dir = create_test_movie_dir();
        // A directory where the movie should go makes the final rename fail
        let blocked = movie_dir.path().join("walk.txt");
        std::fs::create_dir(&blocked).unwrap();

        let result = save_file(&blocked, &patterned_movie(3, 2));

        assert!(matches!(result, Err(SaveError::Io(_))));
        let entries: Vec<_> = std::fs::read_dir(movie_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("walk.txt")]);
        assert!(blocked.is_dir());
    }

    #[test]
    fn test_load_file_reports_format_errors() {
        let movie_dir = create_test_movie_dir();
        let path = create_test_file(&movie_dir, "broken.txt", "1\n3\nll\nlll\nlll");

        let err = load_file(&path).unwrap_err();

        assert!(matches!(
            err,
            LoadError::Format(FormatError::ShortRow { .. })
        ));
        assert!(err.to_string().starts_with("Invalid movie file"));
    }

    #[rstest]
    #[case("movie", "movie.txt")]
    #[case("movie.txt", "movie.txt")]
    #[case("movie.bin", "movie.bin.txt")]
    #[case("dir/movie", "dir/movie.txt")]
    #[case("movie.TXT", "movie.TXT.txt")]
    fn test_with_movie_extension(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(with_movie_extension(Path::new(input)), PathBuf::from(expected));
    }
}
