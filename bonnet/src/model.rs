//! Recomputation pipeline from the joint coordinates to the drawing outputs.
use crate::{
    build_table, path_for, view_box_for, Joint, JointSet, LookupEntry, LookupTable, Range, Raw,
    Resolved, Synchronizer, ViewBox,
};

/// Memoized state of a bonnet linkage session.
///
/// The table is rebuilt in full whenever the joints change, then every
/// derived value is refreshed from it.
#[derive(Clone, Debug)]
pub struct Model {
    joints: JointSet,
    table: LookupTable,
    range: Range,
    view_box: ViewBox,
    sync: Synchronizer,
    last: Resolved,
    path: String,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(JointSet::default())
    }
}

impl Model {
    /// Create a model from the joint positions.
    pub fn new(joints: JointSet) -> Self {
        let table = build_table(&joints);
        let mut model = Self {
            joints,
            range: table.range(),
            view_box: view_box_for(&table),
            table,
            sync: Synchronizer::new(),
            last: Resolved::default(),
            path: String::new(),
        };
        let ans = model.sync.retable(&model.table);
        model.show(ans);
        model
    }

    /// Replace all joint positions.
    ///
    /// Return true if the table was rebuilt.
    pub fn set_joints(&mut self, joints: JointSet) -> bool {
        if joints == self.joints {
            return false;
        }
        self.joints = joints;
        self.rebuild();
        true
    }

    /// Set a single coordinate, `axis` is 0, 1 or 2 for x, y and z.
    ///
    /// Return true if the table was rebuilt.
    pub fn set_coord(&mut self, joint: Joint, axis: usize, raw: Raw) -> bool {
        let mut joints = self.joints;
        match joints.get_mut(joint).0.get_mut(axis) {
            Some(c) => *c = crate::coerce(raw),
            None => return false,
        }
        self.set_joints(joints)
    }

    /// The user edited the bonnet angle.
    pub fn edit_bonnet_angle(&mut self, angle: f64) -> &Resolved {
        let ans = self.sync.edit_bonnet_angle(&self.table, angle);
        self.show(ans)
    }

    /// The user edited the input offset.
    pub fn edit_input_offset(&mut self, offset: f64) -> &Resolved {
        let ans = self.sync.edit_input_offset(&self.table, offset);
        self.show(ans)
    }

    fn rebuild(&mut self) {
        self.table = build_table(&self.joints);
        self.range = self.table.range();
        self.view_box = view_box_for(&self.table);
        let ans = self.sync.retable(&self.table);
        self.show(ans);
    }

    fn show(&mut self, ans: Resolved) -> &Resolved {
        self.path = path_for(&ans.entry);
        self.last = ans;
        &self.last
    }

    /// Joint positions.
    pub fn joints(&self) -> &JointSet {
        &self.joints
    }

    /// Lookup table.
    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Range of the table.
    pub fn range(&self) -> &Range {
        &self.range
    }

    /// View box of the table.
    pub fn view_box(&self) -> &ViewBox {
        &self.view_box
    }

    /// Current bonnet angle control value.
    pub fn bonnet_angle(&self) -> f64 {
        self.sync.bonnet_angle()
    }

    /// Current input offset control value.
    pub fn input_offset(&self) -> f64 {
        self.sync.input_offset()
    }

    /// The pose shown now.
    pub fn current(&self) -> &LookupEntry {
        &self.last.entry
    }

    /// Outline of the pose shown now.
    pub fn path(&self) -> &str {
        &self.path
    }
}
