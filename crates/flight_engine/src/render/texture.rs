//! Asynchronous texture slots
//!
//! Requesting a texture never blocks. The caller gets a [`TextureSlot`] at
//! once and the loader gets the matching [`PendingTexture`]. Until the loader
//! fulfils it, draws use a 1×1 placeholder. Fulfilment is single-assignment:
//! a slot goes from empty to resolved exactly once and never changes again.
//!
//! Everything here is single-threaded (`Rc`), matching the one-frame-in-flight
//! loop that owns the render context.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::render::api::{BackendResult, RenderContext, TextureHandle};

/// Texture slot errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// A slot was fulfilled twice
    #[error("texture `{url}` was already resolved")]
    AlreadyResolved {
        /// Source URL of the slot
        url: String,
    },
}

/// Reader side of a texture request
#[derive(Debug, Clone)]
pub struct TextureSlot {
    url: Rc<str>,
    cell: Rc<OnceCell<TextureHandle>>,
}

impl TextureSlot {
    /// Source URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The real texture, once it has arrived
    pub fn get(&self) -> Option<TextureHandle> {
        self.cell.get().copied()
    }

    /// Whether the real texture has arrived
    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Writer side of a texture request, held by the loader
#[derive(Debug)]
pub struct PendingTexture {
    url: Rc<str>,
    cell: Rc<OnceCell<TextureHandle>>,
}

impl PendingTexture {
    /// Source URL to load
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Publish the loaded texture
    ///
    /// # Errors
    /// [`TextureError::AlreadyResolved`] if the slot already holds a texture;
    /// the first texture stays in place.
    pub fn fulfill(&self, handle: TextureHandle) -> Result<(), TextureError> {
        self.cell
            .set(handle)
            .map_err(|_| TextureError::AlreadyResolved { url: self.url.to_string() })?;
        log::debug!("Texture `{}` resolved to {:?}", self.url, handle);
        Ok(())
    }
}

/// Create a connected slot/pending pair for `url`
pub fn texture_request(url: &str) -> (TextureSlot, PendingTexture) {
    let url: Rc<str> = Rc::from(url);
    let cell = Rc::new(OnceCell::new());
    (
        TextureSlot { url: Rc::clone(&url), cell: Rc::clone(&cell) },
        PendingTexture { url, cell },
    )
}

/// Something that loads textures in the background
///
/// `request` must return promptly; the source fulfils `pending` whenever the
/// image is ready, possibly never.
pub trait TextureSource {
    /// Start loading `pending.url()`
    fn request(&mut self, pending: PendingTexture);
}

/// Texture source that "loads" after a fixed number of frames
///
/// Image decoding is outside the engine, so the stand-in image is a 2×2
/// checker tinted from the URL bytes. Drive it with [`tick`](Self::tick)
/// once per frame.
#[derive(Debug, Default)]
pub struct DeferredTextureSource {
    delay_frames: u32,
    queue: Vec<(u32, PendingTexture)>,
}

impl DeferredTextureSource {
    /// Create a source that resolves requests after `delay_frames` ticks
    pub const fn new(delay_frames: u32) -> Self {
        Self { delay_frames, queue: Vec::new() }
    }

    /// Requests still waiting
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Advance one frame and fulfil every request whose delay ran out
    ///
    /// Returns how many textures were delivered.
    ///
    /// # Errors
    /// The first texture the context fails to create. That request and every
    /// one not yet looked at stay queued for the next tick.
    pub fn tick(&mut self, ctx: &mut dyn RenderContext) -> BackendResult<usize> {
        let mut delivered = 0;
        let mut queue = std::mem::take(&mut self.queue).into_iter();
        let mut waiting = Vec::with_capacity(queue.len());
        while let Some((remaining, pending)) = queue.next() {
            if remaining > 0 {
                waiting.push((remaining - 1, pending));
                continue;
            }
            let handle = match ctx.create_texture(2, 2, &checker_for(pending.url())) {
                Ok(handle) => handle,
                Err(err) => {
                    waiting.push((0, pending));
                    waiting.extend(queue);
                    self.queue = waiting;
                    return Err(err);
                }
            };
            if let Err(err) = pending.fulfill(handle) {
                log::warn!("{err}");
            } else {
                delivered += 1;
            }
        }
        self.queue = waiting;
        Ok(delivered)
    }
}

impl TextureSource for DeferredTextureSource {
    fn request(&mut self, pending: PendingTexture) {
        log::debug!("Texture `{}` queued, {} frame delay", pending.url(), self.delay_frames);
        self.queue.push((self.delay_frames, pending));
    }
}

fn checker_for(url: &str) -> [u8; 16] {
    let tint = url.bytes().fold(0x9e37_u32, |acc, b| acc.rotate_left(5) ^ u32::from(b));
    let [r, g, b, _] = tint.to_le_bytes();
    let (dr, dg, db) = (r / 2, g / 2, b / 2);
    [r, g, b, 255, dr, dg, db, 255, dr, dg, db, 255, r, g, b, 255]
}

/// Texture slots by URL plus the shared placeholder
#[derive(Debug)]
pub struct TextureLibrary {
    placeholder: TextureHandle,
    slots: HashMap<String, TextureSlot>,
}

impl TextureLibrary {
    /// Texel used for every slot still loading
    pub const PLACEHOLDER_TEXEL: [u8; 4] = [0, 0, 255, 255];

    /// Create the library and its 1×1 placeholder texture
    pub fn new(ctx: &mut dyn RenderContext) -> BackendResult<Self> {
        let placeholder = ctx.create_texture(1, 1, &Self::PLACEHOLDER_TEXEL)?;
        Ok(Self { placeholder, slots: HashMap::new() })
    }

    /// The placeholder texture
    pub const fn placeholder(&self) -> TextureHandle {
        self.placeholder
    }

    /// Request `url`, returning immediately
    ///
    /// A URL already requested returns its existing slot and is not sent to
    /// `source` again.
    pub fn request(&mut self, url: &str, source: &mut dyn TextureSource) -> TextureSlot {
        if let Some(slot) = self.slots.get(url) {
            return slot.clone();
        }
        let (slot, pending) = texture_request(url);
        source.request(pending);
        self.slots.insert(url.to_string(), slot.clone());
        slot
    }

    /// Texture to bind for `url` right now
    ///
    /// The real texture once resolved, the placeholder until then (and for
    /// URLs that were never requested).
    pub fn resolve(&self, url: &str) -> TextureHandle {
        self.slots.get(url).and_then(TextureSlot::get).unwrap_or(self.placeholder)
    }

    /// Number of requested URLs that have resolved
    pub fn resolved_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_resolved()).count()
    }

    /// Number of requested URLs
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing has been requested
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::api::{BufferHandle, ProgramHandle, Topology, Uniform};
    use crate::render::{HeadlessContext, RenderError};

    #[derive(Default)]
    struct HoldingSource {
        held: Vec<PendingTexture>,
    }

    impl TextureSource for HoldingSource {
        fn request(&mut self, pending: PendingTexture) {
            self.held.push(pending);
        }
    }

    #[test]
    fn test_fulfill_is_single_assignment() {
        let mut ctx = HeadlessContext::new();
        let first = ctx.create_texture(1, 1, &[1, 2, 3, 4]).unwrap();
        let second = ctx.create_texture(1, 1, &[5, 6, 7, 8]).unwrap();

        let (slot, pending) = texture_request("textures/earth.jpg");
        assert!(!slot.is_resolved());
        pending.fulfill(first).unwrap();
        assert_eq!(
            pending.fulfill(second),
            Err(TextureError::AlreadyResolved { url: "textures/earth.jpg".to_string() })
        );
        assert_eq!(slot.get(), Some(first));
    }

    #[test]
    fn test_placeholder_until_resolved() {
        let mut ctx = HeadlessContext::new();
        let mut library = TextureLibrary::new(&mut ctx).unwrap();
        let mut source = HoldingSource::default();

        let slot = library.request("textures/mars.jpg", &mut source);
        assert_eq!(library.resolve("textures/mars.jpg"), library.placeholder());
        assert_eq!(library.resolve("never/requested.png"), library.placeholder());

        let real = ctx.create_texture(1, 1, &[9, 9, 9, 255]).unwrap();
        source.held[0].fulfill(real).unwrap();
        assert!(slot.is_resolved());
        assert_eq!(library.resolve("textures/mars.jpg"), real);
        assert_eq!(library.resolved_count(), 1);
    }

    #[test]
    fn test_duplicate_request_reuses_slot() {
        let mut ctx = HeadlessContext::new();
        let mut library = TextureLibrary::new(&mut ctx).unwrap();
        let mut source = HoldingSource::default();

        library.request("textures/venus.jpg", &mut source);
        library.request("textures/venus.jpg", &mut source);
        assert_eq!(source.held.len(), 1);
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_deferred_source_delivers_after_delay() {
        let mut ctx = HeadlessContext::new();
        let mut library = TextureLibrary::new(&mut ctx).unwrap();
        let mut source = DeferredTextureSource::new(2);

        library.request("textures/sun.jpg", &mut source);
        assert_eq!(source.tick(&mut ctx).unwrap(), 0);
        assert_eq!(source.tick(&mut ctx).unwrap(), 0);
        assert_eq!(library.resolve("textures/sun.jpg"), library.placeholder());

        assert_eq!(source.tick(&mut ctx).unwrap(), 1);
        assert_ne!(library.resolve("textures/sun.jpg"), library.placeholder());
        assert_eq!(source.pending(), 0);
    }

    /// Headless context whose texture uploads can be switched off
    struct FlakyUploads {
        inner: HeadlessContext,
        failing: bool,
    }

    impl RenderContext for FlakyUploads {
        fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> BackendResult<ProgramHandle> {
            self.inner.create_program(vertex_source, fragment_source)
        }

        fn use_program(&mut self, program: ProgramHandle) -> BackendResult<()> {
            self.inner.use_program(program)
        }

        fn create_vertex_buffer(&mut self, data: &[u8]) -> BackendResult<BufferHandle> {
            self.inner.create_vertex_buffer(data)
        }

        fn bind_attribute(
            &mut self,
            program: ProgramHandle,
            buffer: BufferHandle,
            name: &str,
            components: u32,
        ) -> BackendResult<()> {
            self.inner.bind_attribute(program, buffer, name, components)
        }

        fn set_uniform(&mut self, program: ProgramHandle, name: &str, value: Uniform) -> BackendResult<()> {
            self.inner.set_uniform(program, name, value)
        }

        fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> BackendResult<TextureHandle> {
            if self.failing {
                return Err(RenderError::InvalidBuffer("out of texture memory".to_string()));
            }
            self.inner.create_texture(width, height, rgba)
        }

        fn bind_texture(&mut self, unit: u32, texture: TextureHandle) -> BackendResult<()> {
            self.inner.bind_texture(unit, texture)
        }

        fn draw_arrays(&mut self, topology: Topology, first: usize, count: usize) -> BackendResult<()> {
            self.inner.draw_arrays(topology, first, count)
        }

        fn clear(&mut self, color: [f32; 4]) {
            self.inner.clear(color);
        }

        fn enable_depth_test(&mut self) {
            self.inner.enable_depth_test();
        }
    }

    #[test]
    fn test_failed_upload_keeps_requests_queued() {
        let mut ctx = FlakyUploads { inner: HeadlessContext::new(), failing: false };
        let mut library = TextureLibrary::new(&mut ctx).unwrap();
        let mut source = DeferredTextureSource::new(0);
        for url in ["textures/sun.jpg", "textures/earth.jpg", "textures/mars.jpg"] {
            library.request(url, &mut source);
        }

        ctx.failing = true;
        assert!(source.tick(&mut ctx).is_err());
        assert_eq!(source.pending(), 3);
        assert_eq!(library.resolved_count(), 0);

        ctx.failing = false;
        assert_eq!(source.tick(&mut ctx).unwrap(), 3);
        assert_eq!(source.pending(), 0);
        assert_eq!(library.resolved_count(), 3);
    }
}
