//! Background bitmap loading.
//!
//! Each request decodes on its own worker thread. Finished decodes are
//! handed back over a channel and uploaded on the render thread by
//! [`BitmapLoader::poll`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use crate::error::EngineError;
use crate::facade::{BitmapLoad, LoadState};
use crate::render::{Renderer, UvRect};

/// Destination for decoded bitmaps.
pub trait TextureSink {
    fn register_texture(&mut self, name: &str, data: &[u8], width: u32, height: u32);

    fn set_uvs(&mut self, texture: &str, uvs: &[(String, UvRect)]);
}

impl TextureSink for Renderer<'_> {
    fn register_texture(&mut self, name: &str, data: &[u8], width: u32, height: u32) {
        Renderer::register_texture(self, name, data, width, height);
    }

    fn set_uvs(&mut self, texture: &str, uvs: &[(String, UvRect)]) {
        Renderer::set_uvs(self, texture, uvs);
    }
}

struct DecodedBitmap {
    id: u64,
    path: PathBuf,
    result: image::ImageResult<image::RgbaImage>,
}

struct PendingBitmap {
    path: String,
    uvs: Vec<(String, UvRect)>,
    load: BitmapLoad,
}

pub struct BitmapLoader {
    root: PathBuf,
    sender: Sender<DecodedBitmap>,
    receiver: Receiver<DecodedBitmap>,
    pending: HashMap<u64, PendingBitmap>,
    next_id: u64,
}

impl BitmapLoader {
    /// Loader resolving request paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            root: root.into(),
            sender,
            receiver,
            pending: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Starts decoding `path`. The returned handle settles during a later
    /// [`poll`](Self::poll).
    pub fn request(&mut self, path: &str, uvs: Vec<(String, UvRect)>) -> BitmapLoad {
        let id = self.next_id;
        self.next_id += 1;

        let load = BitmapLoad::pending();
        self.pending.insert(
            id,
            PendingBitmap {
                path: path.to_string(),
                uvs,
                load: load.clone(),
            },
        );

        let full_path = self.root.join(path);
        let sender = self.sender.clone();
        log::debug!("loading bitmap {}", full_path.display());
        thread::spawn(move || {
            let result = image::open(&full_path).map(|image| image.to_rgba8());
            // The loader may already be gone at shutdown.
            let _ = sender.send(DecodedBitmap {
                id,
                path: full_path,
                result,
            });
        });

        load
    }

    /// Number of requests not yet settled.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Uploads every finished decode and settles its handle. Returns how
    /// many requests settled.
    pub fn poll(&mut self, sink: &mut dyn TextureSink) -> usize {
        let mut settled = 0;
        while let Ok(decoded) = self.receiver.try_recv() {
            let Some(request) = self.pending.remove(&decoded.id) else {
                continue;
            };
            settled += 1;

            match decoded.result.map_err(|source| EngineError::ImageDecode {
                path: decoded.path.display().to_string(),
                source,
            }) {
                Ok(image) => {
                    let (width, height) = image.dimensions();
                    sink.register_texture(&request.path, image.as_raw(), width, height);
                    sink.set_uvs(&request.path, &request.uvs);
                    log::debug!(
                        "bitmap `{}` ready with {} uv keys",
                        request.path,
                        request.uvs.len()
                    );
                    request.load.set_state(LoadState::Ready);
                }
                Err(err) => {
                    log::error!("{err}");
                    request.load.set_state(LoadState::Failed);
                }
            }
        }
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingSink {
        textures: Vec<(String, u32, u32)>,
        uvs: Vec<(String, String)>,
    }

    impl TextureSink for RecordingSink {
        fn register_texture(&mut self, name: &str, data: &[u8], width: u32, height: u32) {
            assert_eq!(data.len(), (width * height * 4) as usize);
            self.textures.push((name.to_string(), width, height));
        }

        fn set_uvs(&mut self, texture: &str, uvs: &[(String, UvRect)]) {
            for (key, _) in uvs {
                self.uvs.push((key.clone(), texture.to_string()));
            }
        }
    }

    fn poll_until_settled(loader: &mut BitmapLoader, sink: &mut RecordingSink, load: &BitmapLoad) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while !load.is_settled() && Instant::now() < deadline {
            loader.poll(sink);
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quadstage-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn decoded_bitmap_registers_texture_and_uvs() {
        let dir = scratch_dir("assets-ok");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]))
            .save(dir.join("white.png"))
            .unwrap();

        let mut loader = BitmapLoader::new(&dir);
        let mut sink = RecordingSink::default();
        let load = loader.request("white.png", vec![("white".to_string(), UvRect::FULL)]);
        assert_eq!(load.state(), LoadState::Pending);

        poll_until_settled(&mut loader, &mut sink, &load);
        assert!(load.is_ready());
        assert_eq!(sink.textures, vec![("white.png".to_string(), 4, 2)]);
        assert_eq!(sink.uvs, vec![("white".to_string(), "white.png".to_string())]);
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn missing_file_fails_without_registering() {
        let dir = scratch_dir("assets-missing");
        let mut loader = BitmapLoader::new(&dir);
        let mut sink = RecordingSink::default();
        let load = loader.request("nope.png", vec![("nope".to_string(), UvRect::FULL)]);

        poll_until_settled(&mut loader, &mut sink, &load);
        assert_eq!(load.state(), LoadState::Failed);
        assert!(sink.textures.is_empty());
        assert!(sink.uvs.is_empty());
    }
}
