use std::{
    fs,
    io::{
        self,
        Write,
    },
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
    },
};

/// Shared log file that is flushed after every write, so a panicking test
/// still leaves a complete log behind.
#[derive(Clone)]
pub(crate) struct FlushingWriter {
    file: Arc<Mutex<fs::File>>,
}

impl FlushingWriter {
    pub(crate) fn new(file: fs::File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }

    /// A thread that panicked while logging poisons the lock; the file itself
    /// is still consistent, so both writes and flushes carry on with it.
    fn file(&self) -> MutexGuard<'_, fs::File> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for FlushingWriter {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        let mut file = self.file();
        let written = file.write(buf)?;
        file.flush()?;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn poisoned_lock_keeps_writing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("poisoned.log");
        let mut writer = FlushingWriter::new(fs::File::create(&path).unwrap());

        let shared = writer.clone();
        thread::spawn(move || {
            let _held = shared.file.lock().unwrap();
            panic!("poison the log lock");
        })
        .join()
        .unwrap_err();
        assert!(writer.file.is_poisoned());

        writer.write_all(b"after the panic\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "after the panic\n");
    }
}
