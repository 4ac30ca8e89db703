/// 场景图模块
///
/// 导入的最终产物：节点树 + 网格表 + 材质表。
/// 节点通过索引引用网格，网格通过索引引用材质，构建完成后不再修改。

use super::material::Material;
use super::mesh::Mesh;
use crate::core::math::Matrix4;

/// 场景节点
///
/// 每个 OBJ 对象对应一个节点，挂在场景根节点之下。
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// 节点名称
    pub name: String,

    /// 局部变换（OBJ 不携带变换，默认为单位矩阵）
    pub transform: Matrix4,

    /// 场景网格表中的索引
    pub meshes: Vec<usize>,

    /// 子节点
    pub children: Vec<Node>,
}

impl Node {
    /// 创建一个空节点
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Matrix4::identity(),
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// 以深度优先顺序查找节点（包括自身）
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// 子树中的节点数量（包括自身）
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// 深度优先遍历子树
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// 场景图
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// 根节点
    pub root: Node,

    /// 网格表
    pub meshes: Vec<Mesh>,

    /// 材质表（按声明顺序，回退材质排在最后）
    pub materials: Vec<Material>,
}

impl Scene {
    /// 创建只有根节点的空场景
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: Node::new(root_name),
            meshes: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// 按名称查找节点
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.root.find(name)
    }

    /// 节点总数（包括根节点）
    pub fn node_count(&self) -> usize {
        self.root.count()
    }

    /// 节点引用的网格
    pub fn meshes_of<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Mesh> + 'a {
        node.meshes.iter().filter_map(move |&index| self.meshes.get(index))
    }

    /// 网格使用的材质
    pub fn material_of(&self, mesh: &Mesh) -> Option<&Material> {
        self.materials.get(mesh.material)
    }

    /// 按名称查找材质索引
    pub fn material_index(&self, name: &str) -> Option<usize> {
        self.materials.iter().position(|m| m.name == name)
    }

    /// 所有网格的顶点总数
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Scene {
        let mut scene = Scene::new("root");
        scene.materials.push(Material::new("red"));
        scene.meshes.push(Mesh::with_capacity("cube/red", 0, 0));

        let mut cube = Node::new("cube");
        cube.meshes.push(0);
        let mut lid = Node::new("lid");
        lid.children.push(Node::new("handle"));
        cube.children.push(lid);
        scene.root.children.push(cube);
        scene
    }

    #[test]
    fn test_node_defaults() {
        let node = Node::new("n");
        assert_eq!(node.transform, Matrix4::identity());
        assert!(node.meshes.is_empty());
    }

    #[test]
    fn test_find_node_recurses() {
        let scene = sample();

        assert_eq!(scene.find_node("handle").unwrap().name, "handle");
        assert!(scene.find_node("missing").is_none());
        assert_eq!(scene.node_count(), 4);
    }

    #[test]
    fn test_walk_is_depth_first() {
        let scene = sample();
        let mut names = Vec::new();
        scene.root.walk(&mut |node| names.push(node.name.as_str()));

        assert_eq!(names, vec!["root", "cube", "lid", "handle"]);
    }

    #[test]
    fn test_mesh_and_material_lookup() {
        let scene = sample();
        let cube = scene.find_node("cube").unwrap();
        let meshes: Vec<_> = scene.meshes_of(cube).collect();

        assert_eq!(meshes.len(), 1);
        assert_eq!(scene.material_of(meshes[0]).unwrap().name, "red");
        assert_eq!(scene.material_index("red"), Some(0));
    }
}
