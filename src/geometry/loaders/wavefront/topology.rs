/// 拓扑构建
///
/// 把 [`Model`] 中按对象/材质归组、多重索引的面展开为场景图：
///
/// 1. 统计每个网格的输出顶点数（点：n，线段：2(n-1)，多边形：n）
/// 2. 按输出顶点数分配扁平数组，每个面角点输出一个顶点，不跨角点去重
/// 3. 解析角点的位置/法线/UV 索引，越界是致命错误
/// 4. 按声明顺序建立场景材质表，回退材质排在最后
/// 5. 每个对象一个节点，挂在根节点下，子对象递归处理

use super::model::{Face, FaceKind, MaterialRef, MeshBuilder, Model, ObjectNode};
use crate::core::config::ImportConfig;
use crate::core::error::{ImportError, ImportErrorKind};
use crate::geometry::material::Material;
use crate::geometry::mesh::{Mesh, Primitive, PrimitiveKind};
use crate::geometry::scene::{Node, Scene};

/// 面输出的顶点数
pub fn emitted_vertex_count(face: &Face) -> usize {
    let corners = face.corners.len();
    match face.kind {
        FaceKind::Point => corners,
        FaceKind::Line => 2 * corners.saturating_sub(1),
        FaceKind::Polygon => corners,
    }
}

/// 多边形面的输出类型：不超过三个角点报告为三角形
fn polygon_kind(corners: usize) -> PrimitiveKind {
    if corners > 3 {
        PrimitiveKind::Polygon
    } else {
        PrimitiveKind::Triangle
    }
}

/// 从中间模型构建场景图
pub fn build_scene(model: &Model, config: &ImportConfig, root_name: &str) -> Result<Scene, ImportError> {
    let mut scene = Scene::new(root_name);

    scene.materials = model
        .materials()
        .iter()
        .chain(model.default_material())
        .map(|material| export_material(material, config))
        .collect();
    let default_index = model.materials().len();

    let builder = TopologyBuilder {
        model,
        config,
        default_index,
    };
    for object in &model.objects {
        let node = builder.build_node(object, &mut scene)?;
        scene.root.children.push(node);
    }

    crate::import_debug!(
        nodes = scene.node_count(),
        meshes = scene.meshes.len(),
        materials = scene.materials.len(),
        "scene graph built"
    );
    Ok(scene)
}

/// 导出材质：高光指数按配置缩放
fn export_material(material: &Material, config: &ImportConfig) -> Material {
    let mut exported = material.clone();
    exported.shininess *= config.shininess_scale;
    exported
}

struct TopologyBuilder<'a> {
    model: &'a Model,
    config: &'a ImportConfig,
    default_index: usize,
}

impl TopologyBuilder<'_> {
    fn build_node(&self, object: &ObjectNode, scene: &mut Scene) -> Result<Node, ImportError> {
        let mut node = Node::new(object.name.as_str());
        node.transform = object.transform;

        for &mesh_id in &object.meshes {
            let builder = &self.model.meshes[mesh_id];
            if builder.faces.is_empty() {
                continue;
            }
            let mesh = self.build_mesh(object, builder)?;
            scene.meshes.push(mesh);
            node.meshes.push(scene.meshes.len() - 1);
        }

        for child in &object.children {
            let child = self.build_node(child, scene)?;
            node.children.push(child);
        }
        Ok(node)
    }

    fn material_index(&self, material: MaterialRef) -> usize {
        match material {
            MaterialRef::Library(index) => index,
            MaterialRef::Default => self.default_index,
        }
    }

    fn build_mesh(&self, object: &ObjectNode, builder: &MeshBuilder) -> Result<Mesh, ImportError> {
        let faces: Vec<&Face> = builder.faces.iter().map(|&id| &self.model.faces[id]).collect();
        debug_assert!(faces.iter().all(|face| face.material == builder.material));

        let vertex_count: usize = faces.iter().map(|face| emitted_vertex_count(face)).sum();
        if vertex_count == 0 {
            let line = faces.first().map(|face| face.line).unwrap_or_default();
            return Err(ImportError::new(ImportErrorKind::EmptyMesh {
                object: object.name.clone(),
            })
            .at_line(line, format!("object {}", object.name)));
        }

        let material = self.material_index(builder.material);
        let material_name = self
            .model
            .materials()
            .get(material)
            .map(|m| m.name.as_str())
            .unwrap_or(crate::geometry::material::DEFAULT_MATERIAL_NAME);

        let mut emitter = VertexEmitter {
            model: self.model,
            flip_v: self.config.flip_texcoord_v,
            mesh: Mesh::with_capacity(format!("{}/{}", object.name, material_name), vertex_count, material),
        };

        let mut pending: Vec<(PrimitiveKind, Vec<u32>)> = Vec::with_capacity(faces.len());
        for face in &faces {
            match face.kind {
                FaceKind::Point => {
                    for corner in 0..face.corners.len() {
                        pending.push((PrimitiveKind::Point, vec![emitter.emit(face, corner)?]));
                    }
                }
                FaceKind::Line => {
                    for segment in 1..face.corners.len() {
                        let start = emitter.emit(face, segment - 1)?;
                        let end = emitter.emit(face, segment)?;
                        pending.push((PrimitiveKind::Line, vec![start, end]));
                    }
                }
                FaceKind::Polygon => {
                    let indices = (0..face.corners.len())
                        .map(|corner| emitter.emit(face, corner))
                        .collect::<Result<Vec<_>, _>>()?;
                    pending.push((polygon_kind(indices.len()), indices));
                }
            }
        }

        let mut mesh = emitter.mesh;
        debug_assert_eq!(mesh.vertex_count(), vertex_count);
        crate::import_debug!(
            mesh = %mesh.name,
            corners = builder.index_count,
            vertices = vertex_count,
            "mesh built"
        );

        // 稳定排序：同类图元保持面的原始顺序
        pending.sort_by_key(|(kind, _)| *kind);
        for (kind, indices) in pending {
            let first_index = mesh.indices.len() as u32;
            mesh.primitives.push(Primitive::new(kind, first_index, indices.len() as u32));
            mesh.indices.extend(indices);
        }

        Ok(mesh)
    }
}

/// 输出顶点写入器
///
/// 单调递增的游标即 `mesh.positions.len()`，网格内所有面共享。
struct VertexEmitter<'a> {
    model: &'a Model,
    flip_v: bool,
    mesh: Mesh,
}

impl VertexEmitter<'_> {
    fn emit(&mut self, face: &Face, corner: usize) -> Result<u32, ImportError> {
        let c = face.corners[corner];
        let out_of_range = |pool: &'static str, index: usize, pool_len: usize| {
            ImportError::new(ImportErrorKind::IndexOutOfRange {
                pool,
                index,
                pool_len,
            })
            .at_line(face.line, format!("corner {} of face", corner + 1))
        };

        let position = self
            .model
            .vertices
            .get(c.position)
            .ok_or_else(|| out_of_range("position", c.position, self.model.vertices.len()))?;

        let normal = match c.normal {
            Some(index) => {
                self.mesh.has_normals = true;
                let n = self
                    .model
                    .normals
                    .get(index)
                    .ok_or_else(|| out_of_range("normal", index, self.model.normals.len()))?;
                [n.x, n.y, n.z]
            }
            None => [0.0; 3],
        };

        let texcoord = match c.texcoord {
            Some(index) => {
                self.mesh.has_texcoords = true;
                let t = self
                    .model
                    .texcoords
                    .get(index)
                    .ok_or_else(|| out_of_range("texcoord", index, self.model.texcoords.len()))?;
                let v = if self.flip_v { 1.0 - t.y } else { t.y };
                [t.x, v]
            }
            None => [0.0; 2],
        };

        let index = self.mesh.positions.len() as u32;
        self.mesh.positions.push([position.x, position.y, position.z]);
        self.mesh.normals.push(normal);
        self.mesh.texcoords.push(texcoord);
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::{Vector2, Vector3};
    use crate::geometry::loaders::wavefront::model::Corner;

    fn corner(position: usize) -> Corner {
        Corner {
            position,
            texcoord: None,
            normal: None,
        }
    }

    fn pool(model: &mut Model, count: usize) {
        for i in 0..count {
            model.vertices.push(Vector3::new(i as f32, 0.0, 0.0));
        }
    }

    fn build(model: &Model) -> Result<Scene, ImportError> {
        build_scene(model, &ImportConfig::default(), "root")
    }

    #[test]
    fn test_emitted_vertex_count() {
        let face = |kind, n| Face {
            kind,
            corners: (0..n).map(corner).collect(),
            material: MaterialRef::Default,
            line: 1,
        };

        assert_eq!(emitted_vertex_count(&face(FaceKind::Point, 3)), 3);
        assert_eq!(emitted_vertex_count(&face(FaceKind::Line, 3)), 4);
        assert_eq!(emitted_vertex_count(&face(FaceKind::Line, 1)), 0);
        assert_eq!(emitted_vertex_count(&face(FaceKind::Polygon, 5)), 5);
    }

    #[test]
    fn test_triangle_and_quad_are_not_triangulated() {
        let mut model = Model::new();
        pool(&mut model, 4);
        model.add_face(FaceKind::Polygon, (0..3).map(corner).collect(), 1);
        model.add_face(FaceKind::Polygon, (0..4).map(corner).collect(), 2);

        let scene = build(&model).unwrap();
        let mesh = &scene.meshes[0];

        assert_eq!(mesh.vertex_count(), 7);
        assert_eq!(mesh.primitive_count(PrimitiveKind::Triangle), 1);
        assert_eq!(mesh.primitive_count(PrimitiveKind::Polygon), 1);
        assert_eq!(mesh.primitives[0], Primitive::new(PrimitiveKind::Triangle, 0, 3));
        assert_eq!(mesh.primitives[1], Primitive::new(PrimitiveKind::Polygon, 3, 4));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_shared_position_with_different_normals_is_split() {
        let mut model = Model::new();
        pool(&mut model, 3);
        model.normals.push(Vector3::new(0.0, 0.0, 1.0));
        model.normals.push(Vector3::new(0.0, 1.0, 0.0));
        let with_normal = |position, normal| Corner {
            position,
            texcoord: None,
            normal: Some(normal),
        };
        model.add_face(
            FaceKind::Polygon,
            vec![with_normal(0, 0), with_normal(1, 0), with_normal(2, 0)],
            1,
        );
        model.add_face(
            FaceKind::Polygon,
            vec![with_normal(0, 1), with_normal(2, 1), with_normal(1, 1)],
            2,
        );

        let mesh = &build(&model).unwrap().meshes[0];

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.positions[0], mesh.positions[3]);
        assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.normals[3], [0.0, 1.0, 0.0]);
        assert!(mesh.has_normals);
        assert!(!mesh.has_texcoords);
    }

    #[test]
    fn test_lines_points_grouped_by_kind() {
        let mut model = Model::new();
        pool(&mut model, 3);
        model.add_face(FaceKind::Polygon, (0..3).map(corner).collect(), 1);
        model.add_face(FaceKind::Line, (0..3).map(corner).collect(), 2);
        model.add_face(FaceKind::Point, vec![corner(2), corner(0)], 3);

        let mesh = &build(&model).unwrap().meshes[0];

        // 3 (三角形) + 4 (两条线段) + 2 (点)
        assert_eq!(mesh.vertex_count(), 9);
        let kinds: Vec<_> = mesh.primitives.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PrimitiveKind::Point,
                PrimitiveKind::Point,
                PrimitiveKind::Line,
                PrimitiveKind::Line,
                PrimitiveKind::Triangle,
            ]
        );
        assert_eq!(mesh.indices_of(PrimitiveKind::Line), &[3, 4, 5, 6]);
        assert_eq!(mesh.indices_of(PrimitiveKind::Point), &[7, 8]);
        assert_eq!(mesh.positions[7], [2.0, 0.0, 0.0]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_position_is_fatal() {
        let mut model = Model::new();
        pool(&mut model, 2);
        model.add_face(FaceKind::Polygon, vec![corner(0), corner(1), corner(5)], 4);

        let err = build(&model).unwrap_err();
        assert!(matches!(
            err.kind,
            ImportErrorKind::IndexOutOfRange { pool: "position", index: 5, pool_len: 2 }
        ));
        assert_eq!(err.line, Some(4));
    }

    #[test]
    fn test_single_point_line_is_empty_mesh() {
        let mut model = Model::new();
        pool(&mut model, 1);
        model.add_face(FaceKind::Line, vec![corner(0)], 1);

        let err = build(&model).unwrap_err();
        assert!(matches!(err.kind, ImportErrorKind::EmptyMesh { .. }));
    }

    #[test]
    fn test_material_table_order_and_default() {
        let mut model = Model::new();
        pool(&mut model, 1);
        let a = model.begin_material("a");
        model.begin_material("b");
        model.editing_material_mut().unwrap().shininess = 8.0;

        model.add_face(FaceKind::Point, vec![corner(0)], 1);
        model.use_material(MaterialRef::Library(a));
        model.add_face(FaceKind::Point, vec![corner(0)], 2);

        let scene = build(&model).unwrap();
        let names: Vec<_> = scene.materials.iter().map(|m| m.name.as_str()).collect();

        assert_eq!(names, vec!["a", "b", "default"]);
        assert_eq!(scene.materials[1].shininess, 32.0);
        assert_eq!(scene.meshes[0].material, 2);
        assert_eq!(scene.meshes[1].material, 0);
        assert_eq!(scene.meshes[1].name, "default/a");
    }

    #[test]
    fn test_texcoord_flip() {
        let mut model = Model::new();
        pool(&mut model, 1);
        model.texcoords.push(Vector2::new(0.25, 0.75));
        model.add_face(
            FaceKind::Point,
            vec![Corner {
                position: 0,
                texcoord: Some(0),
                normal: None,
            }],
            1,
        );

        let plain = build(&model).unwrap();
        assert_eq!(plain.meshes[0].texcoords[0], [0.25, 0.75]);

        let config = ImportConfig {
            flip_texcoord_v: true,
            ..ImportConfig::default()
        };
        let flipped = build_scene(&model, &config, "root").unwrap();
        assert_eq!(flipped.meshes[0].texcoords[0], [0.25, 0.25]);
    }

    #[test]
    fn test_nested_objects_become_child_nodes() {
        let mut model = Model::new();
        pool(&mut model, 1);
        model.select_object("parent");
        model.add_face(FaceKind::Point, vec![corner(0)], 1);
        model.objects[0].children.push(ObjectNode::new("child"));

        let scene = build(&model).unwrap();
        let parent = scene.find_node("parent").unwrap();

        assert_eq!(parent.meshes, vec![0]);
        assert_eq!(parent.children[0].name, "child");
        assert_eq!(scene.node_count(), 3);
    }
}
