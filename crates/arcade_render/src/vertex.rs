/// Corner of the letterboxed quad the frame texture is drawn on. Positions
/// are clip space, texture coordinates have v pointing down.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PresentVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl PresentVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PresentVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(PresentVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(PresentVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }

    /// Two triangles covering `[left, right] × [bottom, top]` in clip space.
    pub fn quad(left: f32, top: f32, right: f32, bottom: f32) -> [PresentVertex; 6] {
        let tl = PresentVertex {
            position: [left, top],
            tex_coords: [0.0, 0.0],
        };
        let tr = PresentVertex {
            position: [right, top],
            tex_coords: [1.0, 0.0],
        };
        let bl = PresentVertex {
            position: [left, bottom],
            tex_coords: [0.0, 1.0],
        };
        let br = PresentVertex {
            position: [right, bottom],
            tex_coords: [1.0, 1.0],
        };
        [tl, bl, tr, tr, bl, br]
    }
}
