//! Mount lifecycle host
//!
//! The stage plays the part of the page around a mounted field: it owns the
//! viewport size, a registry of resize and pointer listeners and a queue of
//! animation-frame requests. [`Stage::attach`] mounts a field onto a surface
//! and [`Stage::detach`] tears it down again, removing its listeners and
//! cancelling its pending frame.
//!
//! Everything runs on the host's thread. Signals are delivered between
//! frames, so a resize always replaces the population before the next
//! update sees it.

use crate::config::FieldConfig;
use crate::error::MountError;
use crate::field::ParticleField;
use crate::math::{DeterministicRng, Extent, RandomSource, Vec2};
use crate::surface::Surface;
use crate::time::frame_steps;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// Opaque handle to a mounted field.
///
/// Handles carry a generation, so a handle kept after `detach` never
/// refers to a later mount that reuses the slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MountHandle {
    slot: u32,
    generation: u32,
}

impl fmt::Display for MountHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.slot, self.generation)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct ListenerId(u64);

/// Pending animation-frame request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct FrameRequest(u64);

/// Host signals a mounted field listens to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Signal {
    Resize,
    PointerMove,
}

struct Listener {
    id: ListenerId,
    signal: Signal,
    target: MountHandle,
}

struct Mount<S, R> {
    field: ParticleField,
    surface: S,
    rng: R,
    listeners: [ListenerId; 2],
    frame: Option<FrameRequest>,
}

impl<S: Surface, R: RandomSource> Mount<S, R> {
    fn tick(&mut self, dt: Duration) {
        match self.surface.context() {
            Some(ctx) => self.field.tick(dt, ctx, &mut self.rng),
            // context went away after mount: keep time moving, draw nothing
            None => self.field.update(frame_steps(dt), &mut self.rng),
        }
    }
}

struct Slot<S, R> {
    generation: u32,
    mount: Option<Mount<S, R>>,
}

pub struct Stage<S, R = DeterministicRng> {
    viewport: Extent,
    slots: Vec<Slot<S, R>>,
    listeners: Vec<Listener>,
    frames: VecDeque<(FrameRequest, MountHandle)>,
    next_listener: u64,
    next_frame: u64,
}

impl<S: Surface, R: RandomSource> Stage<S, R> {
    pub fn new(viewport: Extent) -> Self {
        Self {
            viewport,
            slots: Vec::new(),
            listeners: Vec::new(),
            frames: VecDeque::new(),
            next_listener: 0,
            next_frame: 0,
        }
    }

    /// Mount a field onto `surface`.
    ///
    /// Registers the resize and pointer listeners, sizes the surface to the
    /// viewport, seeds the population and requests the first frame. When
    /// the surface has no drawing context (or the configuration is
    /// invalid) nothing is registered and `None` is returned.
    pub fn attach(&mut self, config: FieldConfig, surface: S, rng: R) -> Option<MountHandle> {
        match self.mount(config, surface, rng) {
            Ok(handle) => Some(handle),
            Err(MountError::ContextUnavailable) => {
                tracing::debug!("no drawing context, particle field not mounted");
                None
            }
            Err(err) => {
                tracing::warn!(%err, "particle field not mounted");
                None
            }
        }
    }

    fn mount(
        &mut self,
        config: FieldConfig,
        mut surface: S,
        mut rng: R,
    ) -> Result<MountHandle, MountError> {
        config.validate()?;
        if surface.context().is_none() {
            return Err(MountError::ContextUnavailable);
        }

        let handle = self.vacant_handle();
        let listeners = [
            self.add_listener(Signal::Resize, handle),
            self.add_listener(Signal::PointerMove, handle),
        ];

        surface.set_extent(self.viewport);
        let field = ParticleField::new(config, self.viewport, &mut rng);
        let frame = self.request_frame(handle);

        self.slots[handle.slot as usize].mount = Some(Mount {
            field,
            surface,
            rng,
            listeners,
            frame: Some(frame),
        });

        tracing::debug!(
            %handle,
            width = self.viewport.width,
            height = self.viewport.height,
            "particle field mounted"
        );
        Ok(handle)
    }

    /// Unmount the field behind `handle` and hand its surface back.
    ///
    /// Removes both listeners and cancels the pending frame. Unknown or
    /// already detached handles are ignored.
    pub fn detach(&mut self, handle: MountHandle) -> Option<S> {
        let slot = self.slots.get_mut(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let mount = slot.mount.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        self.listeners
            .retain(|listener| !mount.listeners.contains(&listener.id));
        if let Some(request) = mount.frame {
            self.cancel_frame(request);
        }

        tracing::debug!(%handle, frames = mount.field.frames(), "particle field unmounted");
        Some(mount.surface)
    }

    /// Unmount every field; returns how many were mounted.
    pub fn detach_all(&mut self) -> usize {
        let handles: Vec<MountHandle> = self.handles().collect();
        handles
            .into_iter()
            .filter_map(|handle| self.detach(handle))
            .count()
    }

    /// Viewport changed: resize every listening surface and reseed its field.
    pub fn dispatch_resize(&mut self, viewport: Extent) {
        self.viewport = viewport;
        for listener in self.listeners.iter().filter(|l| l.signal == Signal::Resize) {
            if let Some(mount) = live_mount(&mut self.slots, listener.target) {
                mount.surface.set_extent(viewport);
                mount.field.resize(viewport, &mut mount.rng);
            }
        }
    }

    /// Pointer moved: record the position on every listening field.
    pub fn dispatch_pointer(&mut self, position: Vec2) {
        for listener in self.listeners.iter().filter(|l| l.signal == Signal::PointerMove) {
            if let Some(mount) = live_mount(&mut self.slots, listener.target) {
                mount.field.set_pointer(position);
            }
        }
    }

    /// Run one animation frame.
    ///
    /// Every request queued before this call is served once: its field is
    /// updated and rendered, and the next frame is requested. Requests
    /// made while serving run on the following call. Returns the number of
    /// fields ticked.
    pub fn run_frame(&mut self, dt: Duration) -> usize {
        let due = std::mem::take(&mut self.frames);
        let mut ticked = 0;
        for (request, handle) in due {
            let Some(mount) = live_mount(&mut self.slots, handle) else {
                continue;
            };
            if mount.frame != Some(request) {
                continue;
            }
            mount.tick(dt);
            ticked += 1;

            let next = self.request_frame(handle);
            if let Some(mount) = live_mount(&mut self.slots, handle) {
                mount.frame = Some(next);
            }
        }
        tracing::trace!(ticked, "frame");
        ticked
    }

    pub fn viewport(&self) -> Extent {
        self.viewport
    }

    pub fn is_mounted(&self, handle: MountHandle) -> bool {
        self.mount_ref(handle).is_some()
    }

    pub fn mounted_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.mount.is_some()).count()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn field(&self, handle: MountHandle) -> Option<&ParticleField> {
        self.mount_ref(handle).map(|mount| &mount.field)
    }

    pub fn surface(&self, handle: MountHandle) -> Option<&S> {
        self.mount_ref(handle).map(|mount| &mount.surface)
    }

    pub fn surface_mut(&mut self, handle: MountHandle) -> Option<&mut S> {
        live_mount(&mut self.slots, handle).map(|mount| &mut mount.surface)
    }

    fn handles(&self) -> impl Iterator<Item = MountHandle> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.mount.as_ref().map(|_| MountHandle {
                slot: index as u32,
                generation: slot.generation,
            })
        })
    }

    fn mount_ref(&self, handle: MountHandle) -> Option<&Mount<S, R>> {
        self.slots
            .get(handle.slot as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.mount.as_ref())
    }

    fn vacant_handle(&mut self) -> MountHandle {
        if let Some(index) = self.slots.iter().position(|slot| slot.mount.is_none()) {
            return MountHandle {
                slot: index as u32,
                generation: self.slots[index].generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            mount: None,
        });
        MountHandle {
            slot: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    fn add_listener(&mut self, signal: Signal, target: MountHandle) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(Listener { id, signal, target });
        id
    }

    fn request_frame(&mut self, target: MountHandle) -> FrameRequest {
        let request = FrameRequest(self.next_frame);
        self.next_frame += 1;
        self.frames.push_back((request, target));
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.frames.retain(|(pending, _)| *pending != request);
    }
}

fn live_mount<S, R>(slots: &mut [Slot<S, R>], handle: MountHandle) -> Option<&mut Mount<S, R>> {
    slots
        .get_mut(handle.slot as usize)
        .filter(|slot| slot.generation == handle.generation)
        .and_then(|slot| slot.mount.as_mut())
}
