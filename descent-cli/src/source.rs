use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use descent::{LoadError, Template, TemplateId, TemplateSource};

/// A [`TemplateSource`] reading each template from `<directory>/<id>.json`.
///
/// The file's own `id` must match the name it was requested by.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Constructs a source for the given directory. The directory is not read until
    /// templates are loaded.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateSource for DirectorySource {
    fn load(&mut self, id: &TemplateId) -> Result<Template, LoadError> {
        let unreadable = |source: Box<dyn std::error::Error + Send + Sync>| LoadError::Unreadable {
            id: id.clone(),
            source,
        };

        let name = id.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(unreadable("not usable as a file name".into()));
        }

        let path = self.root.join(format!("{name}.json"));
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound(id.clone()));
            }
            Err(e) => return Err(unreadable(Box::new(e))),
        };
        let template: Template =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| unreadable(Box::new(e)))?;
        if template.id != *id {
            return Err(unreadable(
                format!("{} declares the id {:?}", path.display(), template.id).into(),
            ));
        }

        log::trace!("loaded template {id} from {}", path.display());
        Ok(template)
    }
}
