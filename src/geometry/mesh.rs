/// 网格数据结构模块
///
/// 定义场景图中的网格：按输出顶点展开的位置/法线/UV 数组，
/// 以及按图元类型分组的索引缓冲。

/// 图元类型
///
/// 顺序即索引缓冲中的分组顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrimitiveKind {
    /// 单顶点点图元（`p` 语句）
    Point,
    /// 两顶点线段（`l` 语句）
    Line,
    /// 三个角点的面
    Triangle,
    /// 超过三个角点的面，不做三角化
    Polygon,
}

impl PrimitiveKind {
    /// 所有类型，按分组顺序排列
    pub const ALL: [PrimitiveKind; 4] = [
        PrimitiveKind::Point,
        PrimitiveKind::Line,
        PrimitiveKind::Triangle,
        PrimitiveKind::Polygon,
    ];
}

/// 图元描述符
///
/// 描述索引缓冲中的一段连续区间。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Primitive {
    /// 图元类型
    pub kind: PrimitiveKind,

    /// 在索引数组中的起始位置
    pub first_index: u32,

    /// 索引数量
    pub index_count: u32,
}

impl Primitive {
    #[inline]
    pub fn new(kind: PrimitiveKind, first_index: u32, index_count: u32) -> Self {
        Self {
            kind,
            first_index,
            index_count,
        }
    }

    /// 索引区间
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.first_index as usize;
        start..start + self.index_count as usize
    }
}

/// 场景网格
///
/// 每个面角点输出一个顶点，位置、法线、UV 三个数组长度始终相同。
/// 缺失的法线或 UV 以零填充，并通过 `has_normals` / `has_texcoords` 标记。
///
/// 索引数组按 [`PrimitiveKind::ALL`] 的顺序分组，
/// 同一类型的图元在索引数组中连续存放。
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// 网格名称（`对象名/材质名`）
    pub name: String,

    /// 顶点位置
    pub positions: Vec<[f32; 3]>,

    /// 顶点法线
    pub normals: Vec<[f32; 3]>,

    /// 纹理坐标
    pub texcoords: Vec<[f32; 2]>,

    /// 是否有任一角点带法线
    pub has_normals: bool,

    /// 是否有任一角点带纹理坐标
    pub has_texcoords: bool,

    /// 按图元类型分组的索引
    pub indices: Vec<u32>,

    /// 图元列表，与 `indices` 的分组顺序一致
    pub primitives: Vec<Primitive>,

    /// 场景材质表中的索引
    pub material: usize,
}

impl Mesh {
    /// 创建一个带容量预分配的空网格
    pub fn with_capacity(name: impl Into<String>, vertex_capacity: usize, material: usize) -> Self {
        Self {
            name: name.into(),
            positions: Vec::with_capacity(vertex_capacity),
            normals: Vec::with_capacity(vertex_capacity),
            texcoords: Vec::with_capacity(vertex_capacity),
            has_normals: false,
            has_texcoords: false,
            indices: Vec::with_capacity(vertex_capacity),
            primitives: Vec::new(),
            material,
        }
    }

    /// 获取顶点数量
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// 获取索引数量
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// 指定类型的图元数量
    pub fn primitive_count(&self, kind: PrimitiveKind) -> usize {
        self.primitives.iter().filter(|p| p.kind == kind).count()
    }

    /// 指定类型的全部索引（连续切片）
    pub fn indices_of(&self, kind: PrimitiveKind) -> &[u32] {
        let mut of_kind = self.primitives.iter().filter(|p| p.kind == kind);
        let Some(first) = of_kind.next() else {
            return &[];
        };
        let end = of_kind.last().unwrap_or(first).range().end;
        &self.indices[first.range().start..end]
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 位置、法线、UV 数组长度一致
    /// - 所有索引都在有效范围内
    /// - 图元区间有效、按类型分组，且索引数与图元类型相符
    pub fn validate(&self) -> Result<(), String> {
        let vertex_count = self.positions.len();
        if self.normals.len() != vertex_count || self.texcoords.len() != vertex_count {
            return Err(format!(
                "attribute length mismatch: positions={}, normals={}, texcoords={}",
                vertex_count,
                self.normals.len(),
                self.texcoords.len()
            ));
        }

        if let Some((i, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, &index)| index as usize >= vertex_count)
        {
            return Err(format!(
                "index {} at position {} exceeds vertex count {}",
                index, i, vertex_count
            ));
        }

        let mut cursor = 0usize;
        let mut previous_kind = None;
        for (i, primitive) in self.primitives.iter().enumerate() {
            let range = primitive.range();
            if range.start != cursor || range.end > self.indices.len() {
                return Err(format!("primitive {} has invalid range {:?}", i, range));
            }
            if previous_kind.is_some_and(|kind| kind > primitive.kind) {
                return Err(format!("primitive {} breaks grouping by kind", i));
            }

            // 不足三个角点的 `f` 也报告为三角形
            let valid = match primitive.kind {
                PrimitiveKind::Point => primitive.index_count == 1,
                PrimitiveKind::Line => primitive.index_count == 2,
                PrimitiveKind::Triangle => (1..=3).contains(&primitive.index_count),
                PrimitiveKind::Polygon => primitive.index_count > 3,
            };
            if !valid {
                return Err(format!(
                    "{:?} primitive {} has {} indices",
                    primitive.kind, i, primitive.index_count
                ));
            }

            cursor = range.end;
            previous_kind = Some(primitive.kind);
        }

        if cursor != self.indices.len() {
            return Err(format!(
                "{} indices are not covered by any primitive",
                self.indices.len() - cursor
            ));
        }

        Ok(())
    }
}
