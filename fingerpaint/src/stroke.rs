use crate::{error::Result, graphics::PixelPos, style::DrawStyle};
use lyon::{
    math::Point,
    path::Path,
    tessellation::{BuffersBuilder, StrokeTessellator, StrokeVertex, VertexBuffers},
};

pub type Mesh = VertexBuffers<Point, u32>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(PixelPos),
    LineTo(PixelPos),
    QuadTo { ctrl: PixelPos, to: PixelPos },
}

/// The uncommitted geometry of one pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokePath {
    commands: Vec<PathCommand>,
}

impl StrokePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// True once anything past a `MoveTo` has been added.
    pub fn has_segments(&self) -> bool {
        self.commands
            .iter()
            .any(|command| !matches!(command, PathCommand::MoveTo(_)))
    }

    pub fn move_to(&mut self, to: PixelPos) {
        self.commands.push(PathCommand::MoveTo(to));
    }

    pub fn line_to(&mut self, to: PixelPos) {
        self.ensure_started(to);
        self.commands.push(PathCommand::LineTo(to));
    }

    pub fn quad_to(&mut self, ctrl: PixelPos, to: PixelPos) {
        self.ensure_started(ctrl);
        self.commands.push(PathCommand::QuadTo { ctrl, to });
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Where the next segment starts.
    pub fn cursor(&self) -> Option<PixelPos> {
        self.commands.last().map(|command| match *command {
            PathCommand::MoveTo(to) | PathCommand::LineTo(to) | PathCommand::QuadTo { to, .. } => {
                to
            }
        })
    }

    fn ensure_started(&mut self, at: PixelPos) {
        if self.commands.is_empty() {
            self.move_to(at);
        }
    }

    pub fn build(&self) -> Path {
        let mut builder = Path::builder();
        let mut open = false;

        for command in self.commands.iter() {
            match *command {
                PathCommand::MoveTo(to) => {
                    if open {
                        builder.end(false);
                    }
                    builder.begin(to.to_point());
                    open = true;
                }

                PathCommand::LineTo(to) => {
                    builder.line_to(to.to_point());
                }

                PathCommand::QuadTo { ctrl, to } => {
                    builder.quadratic_bezier_to(ctrl.to_point(), to.to_point());
                }
            }
        }

        if open {
            builder.end(false);
        }

        builder.build()
    }

    /// Empty mesh when there is nothing visible to draw.
    pub fn tessellate(
        &self,
        style: &DrawStyle,
        tessellator: &mut StrokeTessellator,
    ) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        if !self.has_segments() {
            return Ok(mesh);
        }

        let path = self.build();
        {
            let mut builder = BuffersBuilder::new(&mut mesh, |vertex: StrokeVertex| {
                vertex.position()
            });
            tessellator.tessellate_path(&path, &style.stroke_options(), &mut builder)?;
        }

        Ok(mesh)
    }
}
