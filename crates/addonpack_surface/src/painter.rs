//! Solid-color rectangle pipeline.

use addonpack_platform::FramePaint;
use wgpu::util::DeviceExt;

const SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4<f32>(input.position, 0.0, 1.0);
    out.color = input.color;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return input.color;
}
"#;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 4],
}

pub(crate) struct RectPainter {
    pipeline: wgpu::RenderPipeline,
}

impl RectPainter {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("rect shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("rect pipeline layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("rect pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4],
                }],
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        Self { pipeline }
    }

    /// Encodes one pass that clears the target and draws the frame's
    /// rectangles in paint order.
    pub fn draw(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        target_size: (u32, u32),
        paint: &FramePaint,
    ) {
        let vertices = build_vertices(paint, target_size);
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("rect vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let [r, g, b, a] = paint.clear;
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Some(buffer) = &vertex_buffer {
            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, buffer.slice(..));
            pass.draw(0..vertices.len() as u32, 0..1);
        }
    }
}

/// Expands pixel-space rectangles into two clip-space triangles each.
fn build_vertices(paint: &FramePaint, (width, height): (u32, u32)) -> Vec<Vertex> {
    let (width, height) = (width.max(1) as f32, height.max(1) as f32);
    let to_clip = |x: f32, y: f32| [x / width * 2.0 - 1.0, 1.0 - y / height * 2.0];

    let mut vertices = Vec::with_capacity(paint.rects.len() * 6);
    for rect in &paint.rects {
        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.x + rect.width, rect.y + rect.height);
        let corners = [
            to_clip(x0, y0),
            to_clip(x1, y0),
            to_clip(x1, y1),
            to_clip(x0, y0),
            to_clip(x1, y1),
            to_clip(x0, y1),
        ];
        for position in corners {
            vertices.push(Vertex {
                position,
                color: rect.color,
            });
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use addonpack_platform::FramePaint;

    #[test]
    fn rects_expand_to_two_triangles() {
        let mut paint = FramePaint::default();
        paint.rect(0.0, 0.0, 100.0, 50.0, [1.0, 0.0, 0.0, 1.0]);
        paint.rect(10.0, 10.0, 5.0, 5.0, [0.0, 1.0, 0.0, 1.0]);
        let vertices = build_vertices(&paint, (200, 100));
        assert_eq!(vertices.len(), 12);
    }

    #[test]
    fn full_target_rect_covers_clip_space() {
        let mut paint = FramePaint::default();
        paint.rect(0.0, 0.0, 200.0, 100.0, [1.0; 4]);
        let vertices = build_vertices(&paint, (200, 100));
        assert_eq!(vertices[0].position, [-1.0, 1.0]);
        assert_eq!(vertices[2].position, [1.0, -1.0]);
    }
}
