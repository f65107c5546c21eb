use std::io;
use std::path::Path;

/// Shows a file to the operator without waiting for the viewer to close.
pub trait Previewer {
    fn preview(&self, path: &Path) -> io::Result<()>;
}

impl<P: Previewer + ?Sized> Previewer for &P {
    fn preview(&self, path: &Path) -> io::Result<()> {
        (**self).preview(path)
    }
}

/// Hands the file to the platform's registered default application.
pub struct SystemPreviewer;

impl Previewer for SystemPreviewer {
    fn preview(&self, path: &Path) -> io::Result<()> {
        open::that_detached(path)
    }
}
