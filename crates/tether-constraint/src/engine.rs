//! The host layout engine.
//!
//! Bridges [`Constraint`] values to the Cassowary solver. Every registered
//! region owns six variables (origin, size and both baselines). Activating a
//! constraint translates it into
//! `first - (multiplier × second + constant) RELATION 0` over those variables.

use std::fmt;
use std::mem;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tether_core::{
    Anchor, Attribute, Axis, Constraint, LayoutGuide, LayoutItem, LayoutRegion, LayoutSupport,
    LayoutSupportGuide, Priority, RegionId, RegionKind, Relation, View, ViewController, EQ,
};

use crate::cassowary::{
    Expression, LinearConstraint, Solver, SolverConstraintId, SolverError, Strength, Variable,
};
use crate::error::LayoutError;
use crate::frame::{resolve_direction, Frame, Layout};
use crate::options::{EngineOptions, LayoutDirection};

/// Handle of an active constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintId(u64);

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Solver variables of one region.
#[derive(Debug, Clone, Copy)]
struct RegionVars {
    x: Variable,
    y: Variable,
    width: Variable,
    height: Variable,
    first_baseline: Variable,
    last_baseline: Variable,
}

#[derive(Debug)]
struct RegionEntry {
    name: String,
    kind: RegionKind,
    vars: RegionVars,
    /// Offsets from the top edge; `None` means the bottom edge
    baselines: (Option<f64>, Option<f64>),
    /// Required constraints placing the baseline variables
    baseline_constraints: SmallVec<[SolverConstraintId; 2]>,
}

/// Regions and solver constraints created by a multi-step registration,
/// undone together if a later step fails.
#[derive(Debug, Default)]
struct Staged {
    regions: SmallVec<[RegionId; 3]>,
    constraints: SmallVec<[SolverConstraintId; 12]>,
}

#[derive(Debug)]
struct ActiveConstraint {
    constraint: Constraint,
    handle: SolverConstraintId,
}

/// Registry of regions plus the set of active constraints.
#[derive(Debug)]
pub struct LayoutEngine {
    options: EngineOptions,
    solver: Solver,
    regions: IndexMap<RegionId, RegionEntry>,
    safe_areas: IndexMap<RegionId, LayoutGuide>,
    active: IndexMap<ConstraintId, ActiveConstraint>,
    region_counter: u64,
    constraint_counter: u64,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl LayoutEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            solver: Solver::new(),
            regions: IndexMap::new(),
            safe_areas: IndexMap::new(),
            active: IndexMap::new(),
            region_counter: 0,
            constraint_counter: 0,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Register a free-standing view.
    pub fn add_view(&mut self, name: &str) -> Result<View, LayoutError> {
        self.register(name, RegionKind::View).map(View::new)
    }

    /// Register a layout guide owned by `owner`.
    pub fn add_layout_guide(&mut self, owner: View, name: &str) -> Result<LayoutGuide, LayoutError> {
        self.entry(owner.region_id())?;
        let id = self.register(name, RegionKind::LayoutGuide)?;
        Ok(LayoutGuide::new(id, owner.region_id()))
    }

    /// The safe-area guide of `view`: its edges inset by the configured
    /// safe-area insets. Created on first request.
    pub fn safe_area_layout_guide(&mut self, view: View) -> Result<LayoutGuide, LayoutError> {
        if let Some(guide) = self.safe_areas.get(&view.region_id()) {
            return Ok(*guide);
        }

        let name = format!("{}.safeArea", self.entry(view.region_id())?.name);
        let mut staged = Staged::default();
        match self.build_safe_area(view, &name, &mut staged) {
            Ok(guide) => {
                self.safe_areas.insert(view.region_id(), guide);
                Ok(guide)
            }
            Err(err) => {
                self.roll_back(staged);
                Err(err)
            }
        }
    }

    fn build_safe_area(
        &mut self,
        view: View,
        name: &str,
        staged: &mut Staged,
    ) -> Result<LayoutGuide, LayoutError> {
        let guide = self.add_layout_guide(view, name)?;
        staged.regions.push(guide.region_id());
        let insets = self.options.safe_area_insets;

        for constraint in [
            guide.top() | EQ | view.top() + insets.top,
            guide.left() | EQ | view.left() + insets.left,
            guide.bottom() | EQ | view.bottom() - insets.bottom,
            guide.right() | EQ | view.right() - insets.right,
        ] {
            staged.constraints.push(self.install(&constraint)?);
        }
        Ok(guide)
    }

    /// Register a root view filling the viewport, with legacy top and bottom
    /// layout supports covering the top and bottom safe-area insets.
    pub fn add_view_controller(&mut self, name: &str) -> Result<ViewController, LayoutError> {
        let mut staged = Staged::default();
        match self.build_view_controller(name, &mut staged) {
            Ok(controller) => Ok(controller),
            Err(err) => {
                self.roll_back(staged);
                Err(err)
            }
        }
    }

    fn build_view_controller(
        &mut self,
        name: &str,
        staged: &mut Staged,
    ) -> Result<ViewController, LayoutError> {
        let root = self.register(name, RegionKind::View)?;
        staged.regions.push(root);
        let view = View::new(root);
        let viewport = self.options.viewport;
        let insets = self.options.safe_area_insets;

        staged.constraints.push(self.install_parts(anchor(root, Attribute::Left), None, 0.0)?);
        staged.constraints.push(self.install_parts(anchor(root, Attribute::Top), None, 0.0)?);
        staged.constraints.push(self.install(&(view.width() | EQ | viewport.width))?);
        staged.constraints.push(self.install(&(view.height() | EQ | viewport.height))?);

        let top = self.register(&format!("{}.topLayoutGuide", name), RegionKind::LayoutSupport)?;
        staged.regions.push(top);
        let bottom =
            self.register(&format!("{}.bottomLayoutGuide", name), RegionKind::LayoutSupport)?;
        staged.regions.push(bottom);
        let (top, bottom) = (LayoutSupportGuide::new(top), LayoutSupportGuide::new(bottom));

        for (support, edge, inset) in [
            (top, Attribute::Top, insets.top),
            (bottom, Attribute::Bottom, insets.bottom),
        ] {
            let id = support.region_id();
            for (first, second, constant) in [
                (anchor(id, edge), Some(anchor(root, edge)), 0.0),
                (anchor(id, Attribute::Height), None, inset),
                (anchor(id, Attribute::Left), Some(anchor(root, Attribute::Left)), 0.0),
                (anchor(id, Attribute::Width), Some(anchor(root, Attribute::Width)), 0.0),
            ] {
                staged.constraints.push(self.install_parts(first, second, constant)?);
            }
        }

        Ok(ViewController {
            view,
            top_layout_guide: top,
            bottom_layout_guide: bottom,
        })
    }

    /// Set baseline offsets from the top edge of a region. `None` puts the
    /// baseline on the bottom edge, which is also the default.
    pub fn set_baselines(
        &mut self,
        region: RegionId,
        first: Option<f64>,
        last: Option<f64>,
    ) -> Result<(), LayoutError> {
        let (vars, previous, (old_first, old_last)) = {
            let entry = self.entry_mut(region)?;
            (
                entry.vars,
                mem::take(&mut entry.baseline_constraints),
                entry.baselines,
            )
        };
        for handle in previous {
            self.solver.remove_constraint(handle)?;
        }

        match self.add_baselines(vars, first, last) {
            Ok(handles) => {
                let entry = self.entry_mut(region)?;
                entry.baseline_constraints = handles;
                entry.baselines = (first, last);
                Ok(())
            }
            Err(err) => {
                // The previous placement held before the removal above.
                let handles = self.add_baselines(vars, old_first, old_last)?;
                let entry = self.entry_mut(region)?;
                entry.baseline_constraints = handles;
                let subject = format!("{}.baselines({:?}, {:?})", entry.name, first, last);
                Err(solver_failure(err, subject))
            }
        }
    }

    /// Tie both baseline variables to the region's edges. Nothing is left
    /// installed on failure.
    fn add_baselines(
        &mut self,
        vars: RegionVars,
        first: Option<f64>,
        last: Option<f64>,
    ) -> Result<SmallVec<[SolverConstraintId; 2]>, SolverError> {
        let mut handles = SmallVec::<[SolverConstraintId; 2]>::new();
        for (baseline, offset) in [(vars.first_baseline, first), (vars.last_baseline, last)] {
            let mut expr = Expression::from_variable(baseline);
            expr.add_term(vars.y, -1.0);
            match offset {
                Some(offset) => expr.constant = -offset,
                None => expr.add_term(vars.height, -1.0),
            }
            let added = self.solver.add_constraint(LinearConstraint::new(
                expr,
                Relation::Equal,
                Strength::REQUIRED,
            ));
            match added {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    self.remove_all(handles);
                    return Err(err);
                }
            }
        }
        Ok(handles)
    }

    pub fn region_name(&self, region: RegionId) -> Option<&str> {
        self.regions.get(&region).map(|entry| entry.name.as_str())
    }

    pub fn region_kind(&self, region: RegionId) -> Option<RegionKind> {
        self.regions.get(&region).map(|entry| entry.kind)
    }

    /// Iterate over all regions, in registration order.
    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &str, RegionKind)> {
        self.regions
            .iter()
            .map(|(id, entry)| (*id, entry.name.as_str(), entry.kind))
    }

    /// Install a constraint into the layout.
    ///
    /// Non-required constraints are always accepted. A required constraint
    /// that conflicts with the required constraints already active fails with
    /// [`LayoutError::Unsatisfiable`] and leaves the layout unchanged.
    pub fn activate(&mut self, constraint: &Constraint) -> Result<ConstraintId, LayoutError> {
        let linear = self.translate(constraint)?;
        let handle = self
            .solver
            .add_constraint(linear)
            .map_err(|err| solver_failure(err, constraint))?;

        self.constraint_counter += 1;
        let id = ConstraintId(self.constraint_counter);
        self.active.insert(
            id,
            ActiveConstraint {
                constraint: *constraint,
                handle,
            },
        );
        tracing::debug!(%id, %constraint, "activated constraint");
        Ok(id)
    }

    /// Activate several constraints. If any fails, the ones activated by
    /// this call are deactivated again before the error is returned.
    pub fn activate_all<I>(&mut self, constraints: I) -> Result<Vec<ConstraintId>, LayoutError>
    where
        I: IntoIterator<Item = Constraint>,
    {
        let mut ids = Vec::new();
        for constraint in constraints {
            match self.activate(&constraint) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    for id in ids.into_iter().rev() {
                        self.deactivate(id)?;
                    }
                    return Err(err);
                }
            }
        }
        Ok(ids)
    }

    /// Remove an active constraint, returning it.
    pub fn deactivate(&mut self, id: ConstraintId) -> Result<Constraint, LayoutError> {
        let active = self
            .active
            .shift_remove(&id)
            .ok_or(LayoutError::UnknownConstraint(id))?;
        self.solver.remove_constraint(active.handle)?;
        tracing::debug!(%id, constraint = %active.constraint, "deactivated constraint");
        Ok(active.constraint)
    }

    pub fn is_active(&self, id: ConstraintId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.active.get(&id).map(|active| &active.constraint)
    }

    /// Active constraints, in activation order.
    pub fn active_constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.active
            .iter()
            .map(|(id, active)| (*id, &active.constraint))
    }

    /// Frames of all regions under the current constraint set.
    pub fn layout(&self) -> Layout {
        let frames = self
            .regions
            .iter()
            .map(|(id, entry)| (*id, self.frame_of(&entry.vars)))
            .collect();
        Layout { frames }
    }

    pub fn frame(&self, region: RegionId) -> Option<Frame> {
        self.regions.get(&region).map(|entry| self.frame_of(&entry.vars))
    }

    /// Evaluate `multiplier × region.attribute + constant` for an item.
    pub fn value_of<A: Axis>(&self, item: LayoutItem<A>) -> Result<f64, LayoutError> {
        let expr = self.attribute_expression(item.region(), item.attribute())?;
        let value = expr.evaluate(|variable| self.solver.value(variable));
        Ok(value * item.multiplier() + item.constant())
    }

    fn register(&mut self, name: &str, kind: RegionKind) -> Result<RegionId, LayoutError> {
        self.region_counter += 1;
        let id = RegionId::new(self.region_counter);
        let vars = RegionVars {
            x: self.solver.new_variable(),
            y: self.solver.new_variable(),
            width: self.solver.new_variable(),
            height: self.solver.new_variable(),
            first_baseline: self.solver.new_variable(),
            last_baseline: self.solver.new_variable(),
        };
        self.regions.insert(
            id,
            RegionEntry {
                name: name.to_string(),
                kind,
                vars,
                baselines: (None, None),
                baseline_constraints: SmallVec::new(),
            },
        );
        self.set_baselines(id, None, None)?;
        tracing::debug!(region = %id, name, ?kind, "registered region");
        Ok(id)
    }

    /// Undo a failed multi-step registration.
    fn roll_back(&mut self, staged: Staged) {
        self.remove_all(staged.constraints);
        for region in staged.regions.into_iter().rev() {
            if let Some(entry) = self.regions.shift_remove(&region) {
                self.remove_all(entry.baseline_constraints);
                tracing::debug!(%region, name = %entry.name, "rolled back region");
            }
        }
    }

    fn remove_all<I>(&mut self, handles: I)
    where
        I: IntoIterator<Item = SolverConstraintId>,
        I::IntoIter: DoubleEndedIterator,
    {
        for handle in handles.into_iter().rev() {
            if let Err(err) = self.solver.remove_constraint(handle) {
                tracing::warn!(%err, "failed to remove constraint during rollback");
            }
        }
    }

    fn entry(&self, region: RegionId) -> Result<&RegionEntry, LayoutError> {
        self.regions
            .get(&region)
            .ok_or(LayoutError::UnknownRegion(region))
    }

    fn entry_mut(&mut self, region: RegionId) -> Result<&mut RegionEntry, LayoutError> {
        self.regions
            .get_mut(&region)
            .ok_or(LayoutError::UnknownRegion(region))
    }

    fn frame_of(&self, vars: &RegionVars) -> Frame {
        Frame {
            x: self.solver.value(vars.x),
            y: self.solver.value(vars.y),
            width: self.solver.value(vars.width),
            height: self.solver.value(vars.height),
            first_baseline: self.solver.value(vars.first_baseline),
            last_baseline: self.solver.value(vars.last_baseline),
        }
    }

    /// Linear expression for one attribute of a region.
    fn attribute_expression(
        &self,
        region: RegionId,
        attribute: Attribute,
    ) -> Result<Expression, LayoutError> {
        let v = self.entry(region)?.vars;
        let mut expr = Expression::default();
        match resolve_direction(attribute, self.options.layout_direction) {
            Attribute::Left => expr.add_term(v.x, 1.0),
            Attribute::Right => {
                expr.add_term(v.x, 1.0);
                expr.add_term(v.width, 1.0);
            }
            Attribute::Top => expr.add_term(v.y, 1.0),
            Attribute::Bottom => {
                expr.add_term(v.y, 1.0);
                expr.add_term(v.height, 1.0);
            }
            Attribute::CenterX => {
                expr.add_term(v.x, 1.0);
                expr.add_term(v.width, 0.5);
            }
            Attribute::CenterY => {
                expr.add_term(v.y, 1.0);
                expr.add_term(v.height, 0.5);
            }
            Attribute::Width => expr.add_term(v.width, 1.0),
            Attribute::Height => expr.add_term(v.height, 1.0),
            Attribute::FirstBaseline => expr.add_term(v.first_baseline, 1.0),
            Attribute::LastBaseline => expr.add_term(v.last_baseline, 1.0),
            // resolve_direction never returns these
            Attribute::Leading | Attribute::Trailing => {}
        }
        Ok(expr)
    }

    fn translate(&self, constraint: &Constraint) -> Result<LinearConstraint, LayoutError> {
        let mut expr =
            self.attribute_expression(constraint.first_item(), constraint.first_attribute())?;
        if let Some(second) = constraint.second() {
            let second = self.attribute_expression(second.region, second.attribute)?;
            expr.add_scaled(&second, -constraint.multiplier());
        }

        let (relation, constant) = if self.is_mirrored(constraint) {
            (mirror(constraint.relation()), -constraint.constant())
        } else {
            (constraint.relation(), constraint.constant())
        };
        expr.constant -= constant;

        Ok(LinearConstraint::new(
            expr,
            relation,
            Strength::from(constraint.priority()),
        ))
    }

    /// Leading-to-leading style constraints measure their offset from the
    /// leading edge, which in right-to-left layouts runs towards smaller x.
    fn is_mirrored(&self, constraint: &Constraint) -> bool {
        let directional = |attribute: Attribute| matches!(attribute, Attribute::Leading | Attribute::Trailing);
        self.options.layout_direction == LayoutDirection::RightToLeft
            && directional(constraint.first_attribute())
            && constraint.second_attribute().is_some_and(directional)
    }

    /// Install a required constraint owned by the engine itself.
    fn install(&mut self, constraint: &Constraint) -> Result<SolverConstraintId, LayoutError> {
        let linear = self.translate(constraint)?;
        self.solver
            .add_constraint(linear)
            .map_err(|err| solver_failure(err, constraint))
    }

    /// `first == second + constant` (or `first == constant`), for anchors the
    /// public accessors do not reach.
    fn install_parts(
        &mut self,
        first: Anchor,
        second: Option<Anchor>,
        constant: f64,
    ) -> Result<SolverConstraintId, LayoutError> {
        let mut expr = self.attribute_expression(first.region, first.attribute)?;
        if let Some(second) = second {
            let second = self.attribute_expression(second.region, second.attribute)?;
            expr.add_scaled(&second, -1.0);
        }
        expr.constant -= constant;
        let handle = self.solver.add_constraint(LinearConstraint::new(
            expr,
            Relation::Equal,
            Strength::from(Priority::REQUIRED),
        ))?;
        Ok(handle)
    }
}

fn solver_failure(err: SolverError, subject: impl fmt::Display) -> LayoutError {
    match err {
        SolverError::UnsatisfiableConstraint => {
            tracing::warn!(constraint = %subject, "unable to satisfy required constraint");
            LayoutError::Unsatisfiable {
                constraint: subject.to_string(),
            }
        }
        other => LayoutError::Solver(other),
    }
}

fn mirror(relation: Relation) -> Relation {
    match relation {
        Relation::Equal => Relation::Equal,
        Relation::GreaterThanOrEqual => Relation::LessThanOrEqual,
        Relation::LessThanOrEqual => Relation::GreaterThanOrEqual,
    }
}

fn anchor(region: RegionId, attribute: Attribute) -> Anchor {
    Anchor { region, attribute }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{EdgeInsets, Size};
    use tether_core::{GE, LE};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn phone_options() -> EngineOptions {
        EngineOptions {
            viewport: Size::new(390.0, 844.0),
            layout_direction: LayoutDirection::LeftToRight,
            safe_area_insets: EdgeInsets::new(44.0, 0.0, 34.0, 0.0),
        }
    }

    #[test]
    fn test_view_controller_geometry() {
        let mut engine = LayoutEngine::new(phone_options());
        let controller = engine.add_view_controller("root").unwrap();

        let root = engine.frame(controller.view.region_id()).unwrap();
        assert_close(root.x, 0.0);
        assert_close(root.width, 390.0);
        assert_close(root.height, 844.0);

        let top = engine.frame(controller.top_layout_guide.region_id()).unwrap();
        assert_close(top.y, 0.0);
        assert_close(top.bottom(), 44.0);

        let bottom = engine.frame(controller.bottom_layout_guide.region_id()).unwrap();
        assert_close(bottom.y, 810.0);
        assert_close(bottom.bottom(), 844.0);
        assert_close(bottom.width, 390.0);

        assert_eq!(
            engine.region_kind(controller.top_layout_guide.region_id()),
            Some(RegionKind::LayoutSupport)
        );
        assert_eq!(
            engine.region_name(controller.bottom_layout_guide.region_id()),
            Some("root.bottomLayoutGuide")
        );
    }

    #[test]
    #[allow(deprecated)]
    fn test_pin_to_safe_area_scenario() {
        let mut engine = LayoutEngine::new(phone_options());
        let controller = engine.add_view_controller("root").unwrap();
        let v = engine.add_view("v").unwrap();
        let safe = engine.safe_area_layout_guide(controller.view).unwrap();
        assert_eq!(engine.safe_area_layout_guide(controller.view).unwrap(), safe);

        engine
            .activate_all([
                safe.left() | EQ | v.left(),
                v.right() | EQ | safe.right(),
                safe.top() | EQ | v.top(),
                v.bottom() | EQ | safe.bottom(),
            ])
            .unwrap();

        // Violated, but only at priority 400.
        let loose = controller.top_layout_guide_top() | GE | controller.view.top() * 3.0 + 30.0
            | Priority::new(400.0);
        let loose_id = engine.activate(&loose).unwrap();
        assert!(engine.is_active(loose_id));

        let frame = engine.frame(v.region_id()).unwrap();
        assert_close(frame.x, 0.0);
        assert_close(frame.y, 44.0);
        assert_close(frame.width, 390.0);
        assert_close(frame.height, 766.0);
        assert_close(engine.value_of(controller.top_layout_guide_top()).unwrap(), 0.0);

        // Conflicts with the safe-area pins.
        let err = engine.activate(&(v.width() | EQ | 30.0)).unwrap_err();
        assert!(matches!(err, LayoutError::Unsatisfiable { .. }));
        assert_close(engine.frame(v.region_id()).unwrap().width, 390.0);
        assert_eq!(engine.active_constraints().count(), 5);
    }

    #[test]
    fn test_multiplier_and_constant_from_right_hand_side() {
        let mut engine = LayoutEngine::default();
        let u = engine.add_view("u").unwrap();
        let v = engine.add_view("v").unwrap();

        engine
            .activate_all([
                u.width() | EQ | 100.0,
                u.height() | EQ | 50.0,
                v.width() | EQ | u.width() * 2.0 + 5.0,
                v.height() | EQ | (u.height() + 10.0) / 2.0,
            ])
            .unwrap();

        let frame = engine.frame(v.region_id()).unwrap();
        assert_close(frame.width, 205.0);
        assert_close(frame.height, 30.0);
    }

    #[test]
    fn test_priorities_resolve_conflicts() {
        let mut engine = LayoutEngine::default();
        let v = engine.add_view("v").unwrap();

        engine
            .activate(&(v.width() | EQ | 100.0 | Priority::DEFAULT_LOW))
            .unwrap();
        let high = engine
            .activate(&v.width().equal_to(200.0).with_priority(Priority::DEFAULT_HIGH))
            .unwrap();
        assert_close(engine.frame(v.region_id()).unwrap().width, 200.0);

        let removed = engine.deactivate(high).unwrap();
        assert_eq!(removed.constant(), 200.0);
        assert!(!engine.is_active(high));
        assert!(engine.constraint(high).is_none());
        assert_close(engine.frame(v.region_id()).unwrap().width, 100.0);

        assert_eq!(
            engine.deactivate(high),
            Err(LayoutError::UnknownConstraint(high))
        );
    }

    #[test]
    fn test_unknown_region() {
        let mut engine = LayoutEngine::default();
        let v = engine.add_view("v").unwrap();
        let stranger = View::new(RegionId::new(99));

        let err = engine.activate(&(v.top() | EQ | stranger.top())).unwrap_err();
        assert_eq!(err, LayoutError::UnknownRegion(RegionId(99)));
        assert!(engine.safe_area_layout_guide(stranger).is_err());
        assert_eq!(engine.active_constraints().count(), 0);
    }

    #[test]
    fn test_activate_all_rolls_back() {
        let mut engine = LayoutEngine::default();
        let u = engine.add_view("u").unwrap();
        engine.activate(&(u.width() | EQ | 100.0)).unwrap();

        let err = engine
            .activate_all([u.height() | EQ | 10.0, u.width() | EQ | 50.0])
            .unwrap_err();
        assert!(matches!(err, LayoutError::Unsatisfiable { .. }));
        assert_eq!(engine.active_constraints().count(), 1);

        let frame = engine.frame(u.region_id()).unwrap();
        assert_close(frame.width, 100.0);
        assert_close(frame.height, 0.0);
    }

    #[test]
    fn test_center_alignment() {
        let mut engine = LayoutEngine::default();
        let root = engine.add_view_controller("root").unwrap().view;
        let child = engine.add_view("child").unwrap();

        engine
            .activate_all([
                child.center_x() | EQ | root.center_x(),
                child.center_y() | EQ | root.center_y(),
                child.width() | EQ | root.width() / 4.0,
                child.height() | EQ | 100.0,
            ])
            .unwrap();

        let frame = engine.frame(child.region_id()).unwrap();
        assert_close(frame.x, 300.0);
        assert_close(frame.y, 250.0);
        assert_close(frame.width, 200.0);
    }

    #[test]
    fn test_right_to_left_leading_and_trailing() {
        let mut engine = LayoutEngine::new(EngineOptions {
            viewport: Size::new(400.0, 300.0),
            layout_direction: LayoutDirection::RightToLeft,
            ..EngineOptions::default()
        });
        let root = engine.add_view_controller("root").unwrap().view;
        let pinned = engine.add_view("pinned").unwrap();
        let floating = engine.add_view("floating").unwrap();

        engine
            .activate_all([
                pinned.leading() | EQ | root.leading() + 10.0,
                pinned.width() | EQ | 50.0,
                floating.leading() | GE | root.leading() + 30.0,
                floating.leading() | EQ | root.leading() | Priority::DEFAULT_LOW,
                floating.width() | EQ | 50.0,
            ])
            .unwrap();

        let pinned = engine.frame(pinned.region_id()).unwrap();
        assert_close(pinned.right(), 390.0);
        assert_close(pinned.x, 340.0);

        let floating = engine.frame(floating.region_id()).unwrap();
        assert_close(floating.right(), 370.0);
        assert_close(
            floating.value(Attribute::Leading, LayoutDirection::RightToLeft),
            370.0,
        );
    }

    #[test]
    fn test_baselines() {
        let mut engine = LayoutEngine::default();
        let root = engine.add_view_controller("root").unwrap().view;
        let label = engine.add_view("label").unwrap();
        let icon = engine.add_view("icon").unwrap();
        engine.set_baselines(label.region_id(), Some(12.0), Some(30.0)).unwrap();

        engine
            .activate_all([
                label.top() | EQ | root.top() + 100.0,
                label.height() | EQ | 40.0,
                icon.first_baseline() | EQ | label.first_baseline(),
                icon.height() | EQ | 20.0,
            ])
            .unwrap();

        assert_close(engine.value_of(label.baseline()).unwrap(), 130.0);
        assert_close(engine.frame(icon.region_id()).unwrap().bottom(), 112.0);

        engine.set_baselines(label.region_id(), None, None).unwrap();
        assert_close(engine.value_of(label.first_baseline()).unwrap(), 140.0);
        assert_close(engine.frame(icon.region_id()).unwrap().y, 120.0);
    }

    #[test]
    fn test_layout_lists_every_region() {
        let mut engine = LayoutEngine::default();
        let controller = engine.add_view_controller("root").unwrap();
        let guide = engine.add_layout_guide(controller.view, "spacer").unwrap();
        assert_eq!(guide.owner(), controller.view.region_id());

        let layout = engine.layout();
        let names: Vec<_> = engine.regions().map(|(_, name, _)| name).collect();
        assert_eq!(
            names,
            ["root", "root.topLayoutGuide", "root.bottomLayoutGuide", "spacer"]
        );
        assert_eq!(layout.iter().count(), 4);
        assert_eq!(
            layout.frame(controller.view.region_id()).map(|f| f.width),
            Some(800.0)
        );
    }

    #[test]
    fn test_less_than_or_equal_literal() {
        let mut engine = LayoutEngine::default();
        let v = engine.add_view("v").unwrap();

        engine
            .activate_all([
                v.height() | LE | 120.0,
                v.height() | EQ | 500.0 | Priority::DEFAULT_HIGH,
            ])
            .unwrap();

        assert_close(engine.frame(v.region_id()).unwrap().height, 120.0);
    }

    #[test]
    fn test_rejected_inequality_keeps_earlier_bound() {
        let mut engine = LayoutEngine::default();
        let u = engine.add_view("u").unwrap();
        let v = engine.add_view("v").unwrap();

        engine.activate(&(v.width() | LE | u.width() + 20.0)).unwrap();
        let err = engine
            .activate(&(v.width() | GE | u.width() + 40.0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::Unsatisfiable { .. }));
        assert_eq!(engine.active_constraints().count(), 1);

        let bound = engine.value_of(u.width() + 20.0).unwrap();
        assert!(engine.value_of(v.width()).unwrap() <= bound + 1e-6);

        engine.activate(&(u.width() | EQ | 100.0)).unwrap();
        engine.activate(&(v.width() | GE | 110.0)).unwrap();
        assert!(engine.value_of(v.width()).unwrap() <= 120.0 + 1e-6);
        assert!(engine.value_of(v.width()).unwrap() >= 110.0 - 1e-6);
    }

    #[test]
    fn test_rejected_baselines_restore_previous_placement() {
        let mut engine = LayoutEngine::default();
        let root = engine.add_view_controller("root").unwrap().view;
        let v = engine.add_view("v").unwrap();
        engine.set_baselines(v.region_id(), Some(10.0), Some(30.0)).unwrap();

        engine
            .activate_all([
                v.top() | EQ | root.top(),
                v.height() | EQ | 100.0,
                v.first_baseline() | EQ | root.top() + 10.0,
            ])
            .unwrap();

        let err = engine.set_baselines(v.region_id(), None, None).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Unsatisfiable {
                constraint: "v.baselines(None, None)".to_string()
            }
        );
        assert_close(engine.value_of(v.first_baseline()).unwrap(), 10.0);
        assert_close(engine.value_of(v.last_baseline()).unwrap(), 30.0);

        engine.set_baselines(v.region_id(), Some(10.0), None).unwrap();
        assert_close(engine.value_of(v.first_baseline()).unwrap(), 10.0);
        assert_close(engine.value_of(v.last_baseline()).unwrap(), 100.0);
    }

    #[test]
    fn test_roll_back_removes_staged_regions_and_constraints() {
        let mut engine = LayoutEngine::default();
        let v = engine.add_view("v").unwrap();
        let held = engine.solver.constraint_count();

        let mut staged = Staged::default();
        let guide = engine.register("guide", RegionKind::LayoutGuide).unwrap();
        staged.regions.push(guide);
        staged
            .constraints
            .push(engine.install(&(View::new(guide).width() | EQ | v.width())).unwrap());
        staged
            .constraints
            .push(engine.install_parts(anchor(guide, Attribute::Top), None, 5.0).unwrap());
        assert!(engine.solver.constraint_count() > held);

        engine.roll_back(staged);
        assert!(engine.frame(guide).is_none());
        assert_eq!(engine.regions().count(), 1);
        assert_eq!(engine.solver.constraint_count(), held);
    }

    #[test]
    fn test_failed_safe_area_leaves_no_region() {
        let mut engine = LayoutEngine::default();
        engine.add_view("v").unwrap();
        let stranger = View::new(RegionId::new(42));

        assert_eq!(
            engine.safe_area_layout_guide(stranger),
            Err(LayoutError::UnknownRegion(RegionId::new(42)))
        );
        assert_eq!(engine.regions().count(), 1);
    }

    proptest::proptest! {
        #[test]
        fn prop_accepted_constraints_keep_holding(
            steps in proptest::collection::vec(
                (
                    0usize..4,
                    0usize..4,
                    proptest::prop_oneof![
                        proptest::strategy::Just(EQ),
                        proptest::strategy::Just(GE),
                        proptest::strategy::Just(LE),
                    ],
                    -100.0f64..100.0,
                ),
                1..12,
            ),
        ) {
            let mut engine = LayoutEngine::default();
            let views: Vec<View> = (0..4)
                .map(|i| engine.add_view(&format!("v{}", i)).unwrap())
                .collect();

            let mut accepted = Vec::new();
            for (i, j, relation, constant) in steps {
                let lhs = views[i].width();
                let rhs = views[j].width() + constant;
                if engine.activate(&lhs.relate(relation, rhs)).is_ok() {
                    accepted.push((lhs, relation, rhs));
                }
            }

            for (lhs, relation, rhs) in accepted {
                let left = engine.value_of(lhs).unwrap();
                let right = engine.value_of(rhs).unwrap();
                match relation {
                    Relation::Equal => proptest::prop_assert!((left - right).abs() < 1e-6),
                    Relation::GreaterThanOrEqual => proptest::prop_assert!(left >= right - 1e-6),
                    Relation::LessThanOrEqual => proptest::prop_assert!(left <= right + 1e-6),
                }
            }
        }

        #[test]
        fn prop_solved_frames_satisfy_constraints(
            width in 1.0f64..500.0,
            multiplier in 0.1f64..4.0,
            constant in -50.0f64..50.0,
        ) {
            let mut engine = LayoutEngine::default();
            let u = engine.add_view("u").unwrap();
            let v = engine.add_view("v").unwrap();
            let rhs = u.width() * multiplier + constant;

            engine
                .activate_all([u.width() | EQ | width, v.width() | EQ | rhs])
                .unwrap();

            let solved = engine.frame(v.region_id()).unwrap().width;
            proptest::prop_assert!((solved - (width * multiplier + constant)).abs() < 1e-6);
            proptest::prop_assert!((engine.value_of(rhs).unwrap() - solved).abs() < 1e-6);
        }
    }
}
