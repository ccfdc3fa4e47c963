/*!
Resolving asset paths.

Image paths handed to loaders are usually relative to some asset directory the
application chooses.  [`AssetRoot`] holds that directory.

```
use sprites_and_glyphs::AssetRoot;

let root = AssetRoot::new("/srv/game/assets");
assert_eq!(root.resolve("fonts/lazy.png"), std::path::Path::new("/srv/game/assets/fonts/lazy.png"));
// absolute paths pass through
assert_eq!(root.resolve("/tmp/x.png"), std::path::Path::new("/tmp/x.png"));
```
*/

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoot {
    base: PathBuf,
}

impl AssetRoot {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        AssetRoot { base: base.into() }
    }

    /// The current working directory, or `.` if it can't be determined.
    pub fn current_dir() -> Self {
        match std::env::current_dir() {
            Ok(dir) => AssetRoot::new(dir),
            Err(e) => {
                logwise::warn_sync!(
                    "Can't determine the working directory, using '.': {err}",
                    err = logwise::privacy::LogIt(&e)
                );
                AssetRoot::new(".")
            }
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Joins `relative` onto the base.  Absolute paths are returned unchanged.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.base.join(relative)
    }
}

impl Default for AssetRoot {
    fn default() -> Self {
        AssetRoot::current_dir()
    }
}
