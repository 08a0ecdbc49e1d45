use std::borrow::Cow;
use std::collections::HashMap;

use crate::captions::fonts::{FontChoice, SYSTEM_FALLBACK_STACK};
use crate::captions::layout::TextMeasure;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Shapes caption lines with Parley and paints them with `vello_cpu`.
///
/// One engine per frame worker; Parley contexts are not shared between threads.
pub(crate) struct CaptionTextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family: Option<String>,
    glyph_fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl CaptionTextEngine {
    /// Build an engine, registering the chosen font file when there is one.
    ///
    /// Font bytes that register no family fall back to the system stack.
    pub(crate) fn new(font: &FontChoice) -> Self {
        let mut font_ctx = parley::FontContext::default();
        let family = match font {
            FontChoice::File { path, bytes } => {
                let families = font_ctx
                    .collection
                    .register_fonts(bytes.clone(), None);
                let name = families
                    .first()
                    .and_then(|(id, _)| font_ctx.collection.family_name(*id))
                    .map(str::to_string);
                if name.is_none() {
                    tracing::warn!(font = %path.display(), "font file registered no family");
                }
                name
            }
            FontChoice::SystemDefault => None,
        };

        Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            glyph_fonts: HashMap::new(),
        }
    }

    /// Lay out `text` as a single unbroken line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
    ) -> parley::Layout<TextBrushRgba8> {
        let stack = match &self.family {
            Some(name) => Cow::Owned(name.clone()),
            None => Cow::Borrowed(SYSTEM_FALLBACK_STACK),
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(stack),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Paint every glyph run of `layout` with its top-left at `(x, y)` in a solid color.
    pub(crate) fn fill_layout(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        layout: &parley::Layout<TextBrushRgba8>,
        x: f64,
        y: f64,
        rgba: [u8; 4],
    ) {
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            rgba[0], rgba[1], rgba[2], rgba[3],
        ));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let run_font = run.run().font();
                let font = self
                    .glyph_fonts
                    .entry((run_font.data.id(), run_font.index))
                    .or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(
                            vello_cpu::peniko::Blob::from(run_font.data.data().to_vec()),
                            run_font.index,
                        )
                    })
                    .clone();
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

impl TextMeasure for CaptionTextEngine {
    fn line_width(&mut self, text: &str, size_px: f32) -> f32 {
        self.layout_line(text, size_px).width()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/captions/text.rs"]
mod tests;
