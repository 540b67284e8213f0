//! Framebuffer objects with automatic color slot assignment.
//!
//! Color textures take the lowest free slot unless an explicit slot is
//! requested. After every color attach or detach the full list of requested
//! draw buffers is reissued in ascending slot order and the read buffer is
//! disabled.

mod attachments;


pub use attachments::{AttachmentLayer, AttachmentMap, AttachmentRecord};

use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::debug;
use veil_common::{Rect2D, Size2D};

use crate::context::GpuContext;
use crate::error::{GlError, GlResult};
use crate::gl::{
    Attachment, BlitFilter, ClearMask, FramebufferStatus, GlBackend, GlHandle, GlName, ObjectKey,
    ObjectKind,
};
use crate::texture::{Renderbuffer, Texture};

/// Color slot request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorAttachment {
    /// Lowest free slot, or the slot the texture already occupies.
    #[default]
    Automatic,
    Explicit(u32),
}

pub struct Framebuffer {
    handle: GlHandle,
    size: Size2D,
    viewport: Rect2D,
    max_color_attachments: u32,
    max_draw_buffers: u32,
    attachments: AttachmentMap,
    requested_draw_buffers: BTreeSet<u32>,
    depth_stencil: Option<ObjectKey>,
}

impl Framebuffer {
    pub fn new(ctx: &GpuContext, size: Size2D) -> GlResult<Self> {
        if size.is_empty() {
            return Err(GlError::InvalidArgument(format!(
                "framebuffer size {size} must be non-zero"
            )));
        }
        let gl = ctx.gl();
        let handle = GlHandle::create(gl, ObjectKind::Framebuffer)?;
        let max_color_attachments = gl.max_color_attachments();
        let max_draw_buffers = gl.max_draw_buffers();
        debug!(framebuffer = %handle.key(), %size, "created framebuffer");
        Ok(Self {
            handle,
            size,
            viewport: Rect2D::from_size(size),
            max_color_attachments,
            max_draw_buffers,
            attachments: AttachmentMap::new(max_color_attachments),
            requested_draw_buffers: BTreeSet::new(),
            depth_stencil: None,
        })
    }

    fn gl(&self) -> &Rc<dyn GlBackend> {
        self.handle.gl()
    }

    pub fn name(&self) -> GlName {
        self.handle.name()
    }

    pub fn key(&self) -> ObjectKey {
        self.handle.key()
    }

    pub fn size(&self) -> Size2D {
        self.size
    }

    pub fn viewport(&self) -> Rect2D {
        self.viewport
    }

    pub fn maximum_color_attachments(&self) -> u32 {
        self.max_color_attachments
    }

    pub fn maximum_draw_buffers(&self) -> u32 {
        self.max_draw_buffers
    }

    pub fn bind(&self) {
        self.gl().bind_framebuffer(Some(self.name()));
    }

    pub fn apply_viewport(&self) {
        self.gl().viewport(self.viewport);
    }

    pub fn is_complete(&self) -> bool {
        self.bind();
        self.gl().check_framebuffer_status() == FramebufferStatus::Complete
    }

    pub fn clear(&self, mask: ClearMask) {
        self.bind();
        self.gl().clear(mask);
    }

    pub fn color_slot_of(&self, texture: &Texture) -> Option<u32> {
        self.attachments
            .get(texture.key())
            .and_then(AttachmentRecord::color_slot)
    }

    pub fn attachment_of(&self, texture: &Texture) -> Option<&AttachmentRecord> {
        self.attachments.get(texture.key())
    }

    pub fn attached_color_count(&self) -> usize {
        self.attachments.color_count()
    }

    /// Requested draw buffers, ascending.
    pub fn draw_buffers(&self) -> Vec<u32> {
        self.requested_draw_buffers.iter().copied().collect()
    }

    fn check_fits(&self, texture: &Texture, mip: u32) -> GlResult<()> {
        if !texture.size().fits_within(self.size) {
            return Err(GlError::InvalidArgument(format!(
                "texture {} is larger than framebuffer {}",
                texture.size(),
                self.size
            )));
        }
        if !texture.has_mip(mip) {
            return Err(GlError::InvalidArgument(format!(
                "texture {} has no mip level {mip} ({} levels)",
                texture.key(),
                texture.mip_levels()
            )));
        }
        Ok(())
    }

    fn issue_draw_buffers(&self) {
        // Attach refuses colors past the draw-buffer limit, so this always fits.
        let slots: Vec<u32> = self.requested_draw_buffers.iter().copied().collect();
        self.gl().draw_buffers(&slots);
        self.gl().read_buffer(None);
    }

    // -------------------------------------------------------------------------
    // Color attachments
    // -------------------------------------------------------------------------

    /// Attach every layer of `texture` at `mip`. Returns the slot used.
    pub fn attach_color_texture(
        &mut self,
        texture: &Texture,
        mip: u32,
        request: ColorAttachment,
    ) -> GlResult<u32> {
        self.attach_color(texture, mip, AttachmentLayer::All, request)
    }

    /// Attach a single layer of an array texture.
    pub fn attach_color_texture_layer(
        &mut self,
        texture: &Texture,
        mip: u32,
        layer: u32,
        request: ColorAttachment,
    ) -> GlResult<u32> {
        if layer >= texture.layers() {
            return Err(GlError::InvalidArgument(format!(
                "texture {} has no layer {layer} ({} layers)",
                texture.key(),
                texture.layers()
            )));
        }
        self.attach_color(texture, mip, AttachmentLayer::Index(layer), request)
    }

    fn attach_color(
        &mut self,
        texture: &Texture,
        mip: u32,
        layer: AttachmentLayer,
        request: ColorAttachment,
    ) -> GlResult<u32> {
        self.check_fits(texture, mip)?;
        if texture.format().is_depth() {
            return Err(GlError::InvalidArgument(format!(
                "depth texture {} cannot be a color attachment",
                texture.key()
            )));
        }
        if let ColorAttachment::Explicit(slot) = request {
            if slot >= self.max_color_attachments {
                return Err(GlError::InvalidArgument(format!(
                    "color slot {slot} is past the last slot {}",
                    self.max_color_attachments.saturating_sub(1)
                )));
            }
        }

        let existing = self
            .attachments
            .get(texture.key())
            .and_then(|record| record.color_slot().map(|slot| (slot, *record)));

        let adds_color = existing.is_none()
            && match request {
                ColorAttachment::Automatic => true,
                ColorAttachment::Explicit(wanted) => self
                    .attachments
                    .occupant(Attachment::Color(wanted))
                    .is_none(),
            };
        if adds_color && self.attached_color_count() >= self.max_draw_buffers as usize {
            return Err(GlError::ResourceExhausted(format!(
                "framebuffer {} already draws to all {} draw buffers",
                self.key(),
                self.max_draw_buffers
            )));
        }

        let slot = match (existing, request) {
            (Some((slot, record)), ColorAttachment::Automatic) => {
                if record.mip == mip && record.layer == layer {
                    return Ok(slot);
                }
                slot
            }
            (Some((slot, record)), ColorAttachment::Explicit(wanted)) if wanted == slot => {
                if record.mip == mip && record.layer == layer {
                    return Ok(slot);
                }
                slot
            }
            (_, ColorAttachment::Explicit(wanted)) => {
                if let Some((old_slot, record)) = existing {
                    self.bind();
                    self.gl().framebuffer_texture(
                        Attachment::Color(old_slot),
                        None,
                        0,
                        record.layer.index(),
                    );
                    self.release_color(texture.key());
                }
                if let Some(evicted) = self.attachments.occupant(Attachment::Color(wanted)) {
                    debug!(slot = wanted, texture = %evicted, "evicting color attachment");
                    self.attachments.remove(evicted);
                }
                wanted
            }
            (None, ColorAttachment::Automatic) => {
                self.attachments.lowest_free_color_slot().ok_or_else(|| {
                    GlError::ResourceExhausted(format!(
                        "all {} color attachments of framebuffer {} are in use",
                        self.max_color_attachments,
                        self.key()
                    ))
                })?
            }
        };

        self.bind();
        self.gl().framebuffer_texture(
            Attachment::Color(slot),
            Some(texture.name()),
            mip,
            layer.index(),
        );
        self.attachments.insert(
            texture.key(),
            AttachmentRecord {
                attachment: Attachment::Color(slot),
                mip,
                layer,
                size: texture.mip_size(mip),
            },
        );
        self.requested_draw_buffers.insert(slot);
        self.issue_draw_buffers();

        debug!(
            framebuffer = %self.key(),
            texture = %texture.key(),
            slot,
            mip,
            ?layer,
            "attached color texture"
        );
        Ok(slot)
    }

    /// Forget a color record without touching the driver.
    fn release_color(&mut self, key: ObjectKey) {
        if let Some(slot) = self.attachments.remove(key).and_then(|r| r.color_slot()) {
            self.requested_draw_buffers.remove(&slot);
        }
    }

    // -------------------------------------------------------------------------
    // Depth attachments
    // -------------------------------------------------------------------------

    pub fn attach_depth_texture(&mut self, texture: &Texture, mip: u32) -> GlResult<()> {
        self.check_fits(texture, mip)?;
        if !texture.format().is_depth() {
            return Err(GlError::InvalidArgument(format!(
                "texture {} is not a depth format ({:?})",
                texture.key(),
                texture.format()
            )));
        }
        if let Some(previous) = self.attachments.occupant(Attachment::Depth) {
            if previous != texture.key() {
                self.attachments.remove(previous);
            }
        }

        self.bind();
        let gl = self.gl();
        gl.framebuffer_texture(Attachment::Depth, Some(texture.name()), mip, None);
        if self.requested_draw_buffers.is_empty() {
            gl.draw_buffers(&[]);
        }
        gl.read_buffer(None);

        self.attachments.insert(
            texture.key(),
            AttachmentRecord {
                attachment: Attachment::Depth,
                mip,
                layer: AttachmentLayer::All,
                size: texture.mip_size(mip),
            },
        );
        debug!(framebuffer = %self.key(), texture = %texture.key(), mip, "attached depth texture");
        Ok(())
    }

    pub fn attach_depth_stencil_renderbuffer(
        &mut self,
        renderbuffer: &Renderbuffer,
    ) -> GlResult<()> {
        if !renderbuffer.size().fits_within(self.size) {
            return Err(GlError::InvalidArgument(format!(
                "renderbuffer {} is larger than framebuffer {}",
                renderbuffer.size(),
                self.size
            )));
        }
        self.bind();
        let gl = self.gl();
        gl.bind_renderbuffer(Some(renderbuffer.name()));
        gl.framebuffer_renderbuffer(Attachment::DepthStencil, Some(renderbuffer.name()));
        self.depth_stencil = Some(renderbuffer.key());
        debug!(framebuffer = %self.key(), renderbuffer = %renderbuffer.key(), "attached depth-stencil renderbuffer");
        Ok(())
    }

    pub fn has_depth_stencil(&self) -> bool {
        self.depth_stencil.is_some()
    }

    // -------------------------------------------------------------------------
    // Detach
    // -------------------------------------------------------------------------

    pub fn detach_texture(&mut self, texture: &Texture) -> GlResult<()> {
        let Some(record) = self.attachments.remove(texture.key()) else {
            return Err(GlError::InvalidArgument(format!(
                "texture {} is not attached to framebuffer {}",
                texture.key(),
                self.key()
            )));
        };

        self.bind();
        self.gl()
            .framebuffer_texture(record.attachment, None, 0, record.layer.index());
        if let Some(slot) = record.color_slot() {
            self.requested_draw_buffers.remove(&slot);
            self.issue_draw_buffers();
        }
        debug!(framebuffer = %self.key(), texture = %texture.key(), attachment = ?record.attachment, "detached texture");
        Ok(())
    }

    pub fn detach_all_color_attachments(&mut self) {
        self.bind();
        for record in self.attachments.remove_all_color() {
            self.gl()
                .framebuffer_texture(record.attachment, None, 0, record.layer.index());
        }
        self.requested_draw_buffers.clear();
        self.issue_draw_buffers();
    }

    // -------------------------------------------------------------------------
    // Draw buffers and blits
    // -------------------------------------------------------------------------

    /// Restrict rendering to the given attached color textures.
    pub fn activate_draw_buffers(&mut self, textures: &[&Texture]) -> GlResult<()> {
        if textures.len() > self.max_draw_buffers as usize {
            return Err(GlError::InvalidArgument(format!(
                "{} draw buffers requested, at most {} supported",
                textures.len(),
                self.max_draw_buffers
            )));
        }
        let slots = textures
            .iter()
            .map(|texture| {
                self.color_slot_of(texture).ok_or_else(|| {
                    GlError::InvalidArgument(format!(
                        "texture {} is not a color attachment of framebuffer {}",
                        texture.key(),
                        self.key()
                    ))
                })
            })
            .collect::<GlResult<BTreeSet<u32>>>()?;

        self.requested_draw_buffers = slots;
        self.bind();
        self.issue_draw_buffers();
        Ok(())
    }

    /// Render to every attached color texture again.
    pub fn activate_all_draw_buffers(&mut self) {
        self.requested_draw_buffers = self.attachments.color_slots().into_iter().collect();
        self.bind();
        self.issue_draw_buffers();
    }

    /// Copy `from` into `to`, both attached to this framebuffer.
    pub fn blit(&self, from: &Texture, to: &Texture, linear: bool) -> GlResult<()> {
        let lookup = |texture: &Texture, role: &str| {
            self.attachments
                .get(texture.key())
                .and_then(|record| record.color_slot().map(|slot| (slot, record.size)))
                .ok_or_else(|| {
                    GlError::InvalidArgument(format!(
                        "cannot blit {role} texture {}: not a color attachment",
                        texture.key()
                    ))
                })
        };
        let (src_slot, src_size) = lookup(from, "source")?;
        let (dst_slot, dst_size) = lookup(to, "destination")?;

        self.bind();
        let gl = self.gl();
        gl.read_buffer(Some(src_slot));
        gl.draw_buffers(&[dst_slot]);
        let filter = if linear {
            BlitFilter::Linear
        } else {
            BlitFilter::Nearest
        };
        gl.blit_framebuffer(
            Rect2D::from_size(src_size),
            Rect2D::from_size(dst_size),
            filter,
        );
        self.issue_draw_buffers();
        Ok(())
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("handle", &self.handle)
            .field("size", &self.size)
            .field("attachments", &self.attachments)
            .field("draw_buffers", &self.requested_draw_buffers)
            .finish()
    }
}
