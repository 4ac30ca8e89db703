/// 解析阶段的中间数据
///
/// `Model` 由一次导入独占，OBJ 与 MTL 解释器通过参数显式传递它。
/// 所有“当前”状态（对象、网格、材质）都是对内部数组的索引，
/// 数组扩容不会使其失效。

use std::collections::HashMap;

use crate::core::error::ImportErrorKind;
use crate::core::math::{Matrix4, Vector2, Vector3};
use crate::geometry::material::{Material, DEFAULT_MATERIAL_NAME};

pub type FaceId = usize;
pub type ObjectId = usize;
pub type MeshId = usize;

/// 第一个面之前没有 `o`/`g` 时自动创建的对象名称
pub const DEFAULT_OBJECT_NAME: &str = "default";

/// 面引用的材质
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialRef {
    /// 材质库中的第 n 个材质（声明顺序）
    Library(usize),
    /// 回退材质
    Default,
}

/// 面的图元类型（解析阶段）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    Point,
    Line,
    Polygon,
}

/// 面角点：0 起始的数据池索引，尚未做越界检查
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// 一个面（`f`、`l` 或 `p` 语句）
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub kind: FaceKind,
    pub corners: Vec<Corner>,
    /// 面所在网格绑定的材质
    pub material: MaterialRef,
    /// 来源行号，用于错误定位
    pub line: usize,
}

/// OBJ 对象
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub name: String,
    pub transform: Matrix4,
    pub meshes: Vec<MeshId>,
    pub children: Vec<ObjectNode>,
}

impl ObjectNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Matrix4::identity(),
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// 同一对象、同一材质的面集合
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuilder {
    pub material: MaterialRef,
    pub faces: Vec<FaceId>,
    /// 角点总数
    pub index_count: usize,
}

/// 中间模型
#[derive(Debug, Default)]
pub struct Model {
    pub vertices: Vec<Vector3>,
    pub normals: Vec<Vector3>,
    pub texcoords: Vec<Vector2>,

    pub faces: Vec<Face>,

    pub objects: Vec<ObjectNode>,
    current_object: Option<ObjectId>,

    pub groups: HashMap<String, Vec<FaceId>>,
    active_group: Option<String>,

    pub meshes: Vec<MeshBuilder>,
    current_mesh: Option<MeshId>,

    materials: Vec<Material>,
    material_lookup: HashMap<String, usize>,
    active_material: Option<MaterialRef>,
    editing_material: Option<usize>,
    default_material: Option<Material>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== 对象与分组 ==========

    /// 切换到指定名称的对象，不存在时创建
    pub fn select_object(&mut self, name: &str) -> ObjectId {
        let id = match self.objects.iter().position(|o| o.name == name) {
            Some(id) => id,
            None => {
                self.objects.push(ObjectNode::new(name));
                self.objects.len() - 1
            }
        };
        if self.current_object != Some(id) {
            self.current_object = Some(id);
            self.current_mesh = None;
        }
        id
    }

    /// 当前对象，没有时创建 `"default"`
    pub fn ensure_object(&mut self) -> ObjectId {
        match self.current_object {
            Some(id) => id,
            None => self.select_object(DEFAULT_OBJECT_NAME),
        }
    }

    /// 切换活动分组
    ///
    /// 已存在的分组保留原有成员，后续的面继续追加。
    /// 同时切换到同名对象。
    pub fn select_group(&mut self, name: &str) {
        self.groups.entry(name.to_string()).or_default();
        self.active_group = Some(name.to_string());
        self.select_object(name);
    }

    // ========== 材质 ==========

    /// 开始一个新材质（`newmtl`），同名材质被原位替换并保留索引
    ///
    /// 材质库声明 `default` 时，已绑定回退材质的网格和面改为绑定这个库材质。
    pub fn begin_material(&mut self, name: &str) -> usize {
        let index = match self.material_lookup.get(name) {
            Some(&index) => {
                self.materials[index] = Material::new(name);
                index
            }
            None => {
                self.materials.push(Material::new(name));
                let index = self.materials.len() - 1;
                self.material_lookup.insert(name.to_string(), index);
                if name == DEFAULT_MATERIAL_NAME {
                    self.adopt_default_material(index);
                }
                index
            }
        };
        self.editing_material = Some(index);
        index
    }

    fn adopt_default_material(&mut self, index: usize) {
        let library = MaterialRef::Library(index);
        for mesh in self.meshes.iter_mut().filter(|m| m.material == MaterialRef::Default) {
            mesh.material = library;
        }
        for face in self.faces.iter_mut().filter(|f| f.material == MaterialRef::Default) {
            face.material = library;
        }
        if self.active_material == Some(MaterialRef::Default) {
            self.active_material = Some(library);
        }
        self.default_material = None;
    }

    /// 正在被 MTL 语句修改的材质
    pub fn editing_material_mut(&mut self) -> Option<&mut Material> {
        self.editing_material.map(|index| &mut self.materials[index])
    }

    /// 结束一个材质库文件，之后的 MTL 语句不能再修改此前的材质
    pub fn end_material_library(&mut self) {
        self.editing_material = None;
    }

    pub fn find_material(&self, name: &str) -> Option<usize> {
        self.material_lookup.get(name).copied()
    }

    /// 按声明顺序排列的材质
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// 按声明顺序排列的材质名称
    pub fn material_names(&self) -> impl Iterator<Item = &str> {
        self.materials.iter().map(|m| m.name.as_str())
    }

    /// 回退材质（首次使用时才创建）
    pub fn default_material(&self) -> Option<&Material> {
        self.default_material.as_ref()
    }

    /// 切换活动材质
    ///
    /// 当前网格绑定的是其他材质时，后续的面进入新的网格。
    pub fn use_material(&mut self, material: MaterialRef) {
        let material = self.resolve_material(material);
        self.active_material = Some(material);
        if let Some(mesh) = self.current_mesh {
            if self.meshes[mesh].material != material {
                self.current_mesh = None;
            }
        }
    }

    /// `usemtl` 找不到材质时回退到默认材质
    ///
    /// 当前网格保持原有的材质绑定，不会被切换。
    pub fn fall_back_to_default_material(&mut self) {
        self.active_material = Some(self.resolve_material(MaterialRef::Default));
    }

    pub fn active_material(&self) -> MaterialRef {
        self.resolve_material(self.active_material.unwrap_or(MaterialRef::Default))
    }

    /// 材质库中名为 `default` 的材质代替回退材质
    fn resolve_material(&self, material: MaterialRef) -> MaterialRef {
        match (material, self.find_material(DEFAULT_MATERIAL_NAME)) {
            (MaterialRef::Default, Some(index)) => MaterialRef::Library(index),
            _ => material,
        }
    }

    // ========== 网格与面 ==========

    /// 当前网格，没有时查找或创建（对象, 活动材质）对应的网格
    pub fn ensure_mesh(&mut self) -> MeshId {
        if let Some(mesh) = self.current_mesh {
            return mesh;
        }

        let object = self.ensure_object();
        let material = self.active_material();
        let existing = self.objects[object]
            .meshes
            .iter()
            .copied()
            .find(|&mesh| self.meshes[mesh].material == material);

        let mesh = match existing {
            Some(mesh) => mesh,
            None => {
                self.meshes.push(MeshBuilder {
                    material,
                    faces: Vec::new(),
                    index_count: 0,
                });
                let mesh = self.meshes.len() - 1;
                self.objects[object].meshes.push(mesh);
                mesh
            }
        };
        self.current_mesh = Some(mesh);
        mesh
    }

    /// 添加一个面到当前网格和活动分组
    pub fn add_face(&mut self, kind: FaceKind, corners: Vec<Corner>, line: usize) -> FaceId {
        let mesh = self.ensure_mesh();
        let material = self.meshes[mesh].material;
        if material == MaterialRef::Default && self.default_material.is_none() {
            self.default_material = Some(Material::fallback());
        }

        let id = self.faces.len();
        let corner_count = corners.len();
        self.faces.push(Face {
            kind,
            corners,
            material,
            line,
        });

        let builder = &mut self.meshes[mesh];
        builder.faces.push(id);
        builder.index_count += corner_count;

        if let Some(group) = &self.active_group {
            if let Some(members) = self.groups.get_mut(group) {
                members.push(id);
            }
        }
        id
    }
}

/// 把 OBJ 索引（1 起始，负数为相对索引）转换为 0 起始索引
///
/// 不检查上界：越界在构建拓扑时报告。
pub fn resolve_index(raw: i64, pool_len: usize) -> Result<usize, ImportErrorKind> {
    match raw {
        0 => Err(ImportErrorKind::ZeroIndex),
        i if i > 0 => Ok((i - 1) as usize),
        i => {
            let back = i.unsigned_abs() as usize;
            if back > pool_len {
                Err(ImportErrorKind::RelativeIndexUnderflow {
                    index: i,
                    pool_len,
                })
            } else {
                Ok(pool_len - back)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(position: usize) -> Corner {
        Corner {
            position,
            texcoord: None,
            normal: None,
        }
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(1, 0).unwrap(), 0);
        assert_eq!(resolve_index(-1, 4).unwrap(), 3);
        assert_eq!(resolve_index(-4, 4).unwrap(), 0);
        assert!(matches!(resolve_index(0, 4), Err(ImportErrorKind::ZeroIndex)));
        assert!(matches!(
            resolve_index(-5, 4),
            Err(ImportErrorKind::RelativeIndexUnderflow { .. })
        ));
    }

    #[test]
    fn test_first_face_creates_default_object_and_mesh() {
        let mut model = Model::new();
        model.add_face(FaceKind::Polygon, vec![corner(0), corner(1), corner(2)], 1);

        assert_eq!(model.objects.len(), 1);
        assert_eq!(model.objects[0].name, "default");
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].index_count, 3);
        assert_eq!(model.meshes[0].material, MaterialRef::Default);
        assert!(model.default_material().is_some());
    }

    #[test]
    fn test_select_object_reuses_existing() {
        let mut model = Model::new();
        let a = model.select_object("a");
        model.select_object("b");
        assert_eq!(model.select_object("a"), a);
        assert_eq!(model.objects.len(), 2);
    }

    #[test]
    fn test_material_change_starts_new_mesh() {
        let mut model = Model::new();
        let red = model.begin_material("red");
        let blue = model.begin_material("blue");

        model.use_material(MaterialRef::Library(red));
        model.add_face(FaceKind::Point, vec![corner(0)], 1);
        model.use_material(MaterialRef::Library(red));
        model.add_face(FaceKind::Point, vec![corner(0)], 2);
        assert_eq!(model.meshes.len(), 1);

        model.use_material(MaterialRef::Library(blue));
        model.add_face(FaceKind::Point, vec![corner(0)], 3);
        assert_eq!(model.meshes.len(), 2);

        // 回到 red 时复用同一对象下已有的网格
        model.use_material(MaterialRef::Library(red));
        model.add_face(FaceKind::Point, vec![corner(0)], 4);
        assert_eq!(model.meshes.len(), 2);
        assert_eq!(model.meshes[0].faces, vec![0, 1, 3]);
    }

    #[test]
    fn test_fallback_keeps_current_mesh_binding() {
        let mut model = Model::new();
        let red = model.begin_material("red");
        model.use_material(MaterialRef::Library(red));
        model.add_face(FaceKind::Point, vec![corner(0)], 1);

        model.fall_back_to_default_material();
        model.add_face(FaceKind::Point, vec![corner(0)], 2);

        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].material, MaterialRef::Library(red));
        assert_eq!(model.meshes[0].faces, vec![0, 1]);
        assert_eq!(model.faces[1].material, MaterialRef::Library(red));
    }

    #[test]
    fn test_library_default_replaces_fallback() {
        let mut model = Model::new();
        let default = model.begin_material("default");

        model.add_face(FaceKind::Point, vec![corner(0)], 1);
        model.use_material(MaterialRef::Library(default));
        model.add_face(FaceKind::Point, vec![corner(0)], 2);

        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].material, MaterialRef::Library(default));
        assert_eq!(model.meshes[0].faces, vec![0, 1]);
        assert!(model.default_material().is_none());
    }

    #[test]
    fn test_late_library_default_rebinds_fallback_mesh() {
        let mut model = Model::new();
        model.add_face(FaceKind::Point, vec![corner(0)], 1);
        assert!(model.default_material().is_some());

        let default = model.begin_material("default");
        model.end_material_library();
        model.add_face(FaceKind::Point, vec![corner(0)], 3);

        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].material, MaterialRef::Library(default));
        assert_eq!(model.faces[0].material, MaterialRef::Library(default));
        assert!(model.default_material().is_none());
    }

    #[test]
    fn test_group_membership_accumulates() {
        let mut model = Model::new();
        model.select_group("alpha");
        model.add_face(FaceKind::Point, vec![corner(0)], 1);
        model.select_group("beta");
        model.add_face(FaceKind::Point, vec![corner(0)], 2);
        model.select_group("alpha");
        model.add_face(FaceKind::Point, vec![corner(0)], 3);

        assert_eq!(model.groups["alpha"], vec![0, 2]);
        assert_eq!(model.groups["beta"], vec![1]);
        assert_eq!(model.objects.len(), 2);
    }

    #[test]
    fn test_redefined_material_keeps_index() {
        let mut model = Model::new();
        model.begin_material("a");
        model.begin_material("b");
        model.editing_material_mut().unwrap().alpha = 0.5;
        let again = model.begin_material("b");

        assert_eq!(again, 1);
        assert_eq!(model.materials()[1].alpha, 1.0);
        assert_eq!(model.material_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
