//! Incremental Cassowary solver.
//!
//! An implementation of the Cassowary linear arithmetic constraint solving
//! algorithm (Badros, Borning and Stuckey). Constraints are kept in a simplex
//! tableau; non-required constraints contribute weighted error terms to the
//! objective, so stronger constraints win when the system is over-constrained.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tether_core::{Priority, Relation};
use thiserror::Error;

/// Tolerance for floating-point comparisons.
const EPSILON: f64 = 1e-8;

fn near_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// An unknown the solver computes a value for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(usize);

/// `coefficient × variable`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub variable: Variable,
    pub coefficient: f64,
}

/// A linear expression: `constant + Σ coefficient × variable`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub terms: SmallVec<[Term; 4]>,
    pub constant: f64,
}

impl Expression {
    pub fn from_constant(constant: f64) -> Self {
        Self {
            terms: SmallVec::new(),
            constant,
        }
    }

    pub fn from_variable(variable: Variable) -> Self {
        let mut expr = Self::default();
        expr.add_term(variable, 1.0);
        expr
    }

    /// Add `coefficient × variable`, merging with an existing term.
    pub fn add_term(&mut self, variable: Variable, coefficient: f64) {
        match self.terms.iter_mut().find(|t| t.variable == variable) {
            Some(term) => term.coefficient += coefficient,
            None => self.terms.push(Term {
                variable,
                coefficient,
            }),
        }
    }

    /// Add `scale × other` to this expression.
    pub fn add_scaled(&mut self, other: &Expression, scale: f64) {
        self.constant += other.constant * scale;
        for term in &other.terms {
            self.add_term(term.variable, term.coefficient * scale);
        }
    }

    /// Evaluate against a value lookup.
    pub fn evaluate(&self, value: impl Fn(Variable) -> f64) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |acc, t| acc + t.coefficient * value(t.variable))
    }
}

/// Weight of a constraint in the objective.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Strength(pub f64);

impl Strength {
    pub const REQUIRED: Strength = Strength(1_001_001_000.0);
    pub const STRONG: Strength = Strength(1_000_000.0);
    pub const MEDIUM: Strength = Strength(1_000.0);
    pub const WEAK: Strength = Strength(1.0);

    /// Create a custom strength, capped at required.
    pub fn new(value: f64) -> Self {
        Self(value.min(Self::REQUIRED.0))
    }

    pub fn is_required(&self) -> bool {
        self.0 >= Self::REQUIRED.0
    }
}

impl From<Priority> for Strength {
    fn from(priority: Priority) -> Self {
        if priority.is_required() {
            Strength::REQUIRED
        } else {
            Strength::new(f64::from(priority.value()))
        }
    }
}

/// `expression RELATION 0`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub expression: Expression,
    pub relation: Relation,
    pub strength: Strength,
}

impl LinearConstraint {
    pub fn new(expression: Expression, relation: Relation, strength: Strength) -> Self {
        Self {
            expression,
            relation,
            strength,
        }
    }
}

/// Handle of a constraint held by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolverConstraintId(usize);

/// Errors reported by the solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("the constraint cannot be satisfied")]
    UnsatisfiableConstraint,

    #[error("the constraint is not in the solver")]
    UnknownConstraint,

    #[error("internal solver error: {0}")]
    Internal(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SymbolKind {
    Invalid,
    External,
    Slack,
    Error,
    Dummy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Symbol {
    id: usize,
    kind: SymbolKind,
}

impl Symbol {
    const INVALID: Symbol = Symbol {
        id: 0,
        kind: SymbolKind::Invalid,
    };

    fn is_pivotable(&self) -> bool {
        matches!(self.kind, SymbolKind::Slack | SymbolKind::Error)
    }
}

/// Markers identifying a constraint's symbols in the tableau.
#[derive(Debug, Clone, Copy)]
struct Tag {
    marker: Symbol,
    other: Symbol,
}

#[derive(Debug, Clone, Copy)]
struct Held {
    tag: Tag,
    strength: Strength,
}

/// A tableau row: `basic = constant + Σ coefficient × symbol`.
#[derive(Debug, Clone, Default)]
struct Row {
    constant: f64,
    cells: IndexMap<Symbol, f64>,
}

impl Row {
    fn new(constant: f64) -> Self {
        Self {
            constant,
            cells: IndexMap::new(),
        }
    }

    fn coefficient(&self, symbol: Symbol) -> f64 {
        self.cells.get(&symbol).copied().unwrap_or(0.0)
    }

    fn insert_symbol(&mut self, symbol: Symbol, coefficient: f64) {
        let entry = self.cells.entry(symbol).or_insert(0.0);
        *entry += coefficient;
        if near_zero(*entry) {
            self.cells.swap_remove(&symbol);
        }
    }

    fn insert_row(&mut self, other: &Row, coefficient: f64) {
        self.constant += other.constant * coefficient;
        for (&symbol, &c) in &other.cells {
            self.insert_symbol(symbol, c * coefficient);
        }
    }

    fn remove(&mut self, symbol: Symbol) {
        self.cells.swap_remove(&symbol);
    }

    fn reverse_sign(&mut self) {
        self.constant = -self.constant;
        for c in self.cells.values_mut() {
            *c = -*c;
        }
    }

    /// Rearrange `0 = ... + a × symbol + ...` into `symbol = ...`.
    fn solve_for(&mut self, symbol: Symbol) {
        let coefficient = self.cells.swap_remove(&symbol).unwrap_or(1.0);
        let scale = -1.0 / coefficient;
        self.constant *= scale;
        for c in self.cells.values_mut() {
            *c *= scale;
        }
    }

    /// Rearrange `lhs = ... + a × rhs + ...` into `rhs = ...`.
    fn solve_for_pair(&mut self, lhs: Symbol, rhs: Symbol) {
        self.insert_symbol(lhs, -1.0);
        self.solve_for(rhs);
    }

    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        if let Some(coefficient) = self.cells.swap_remove(&symbol) {
            self.insert_row(row, coefficient);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Objective {
    Main,
    Artificial,
}

/// The Cassowary constraint solver.
#[derive(Debug, Default)]
pub struct Solver {
    symbol_counter: usize,
    variables: Vec<Symbol>,
    constraint_counter: usize,
    constraints: IndexMap<SolverConstraintId, Held>,
    rows: IndexMap<Symbol, Row>,
    objective: Row,
    artificial: Option<Row>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new unknown. Unconstrained variables solve to zero.
    pub fn new_variable(&mut self) -> Variable {
        let symbol = self.new_symbol(SymbolKind::External);
        self.variables.push(symbol);
        Variable(self.variables.len() - 1)
    }

    /// Current value of a variable.
    pub fn value(&self, variable: Variable) -> f64 {
        self.variables
            .get(variable.0)
            .and_then(|symbol| self.rows.get(symbol))
            .map(|row| row.constant)
            .unwrap_or(0.0)
    }

    pub fn has_constraint(&self, id: SolverConstraintId) -> bool {
        self.constraints.contains_key(&id)
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Add a constraint and re-optimize.
    ///
    /// Fails with [`SolverError::UnsatisfiableConstraint`] when a required
    /// constraint conflicts with the required constraints already held. On
    /// any error the tableau is restored to its state before the call.
    pub fn add_constraint(
        &mut self,
        constraint: LinearConstraint,
    ) -> Result<SolverConstraintId, SolverError> {
        let rows = self.rows.clone();
        let objective = self.objective.clone();

        match self.insert_constraint(&constraint) {
            Ok(tag) => {
                let id = SolverConstraintId(self.constraint_counter);
                self.constraint_counter += 1;
                self.constraints.insert(
                    id,
                    Held {
                        tag,
                        strength: constraint.strength,
                    },
                );
                Ok(id)
            }
            Err(err) => {
                self.rows = rows;
                self.objective = objective;
                self.artificial = None;
                Err(err)
            }
        }
    }

    fn insert_constraint(&mut self, constraint: &LinearConstraint) -> Result<Tag, SolverError> {
        let (mut row, tag) = self.create_row(constraint);
        let mut subject = Self::choose_subject(&row, &tag);

        if subject.kind == SymbolKind::Invalid && Self::all_dummies(&row) {
            if !near_zero(row.constant) {
                return Err(SolverError::UnsatisfiableConstraint);
            }
            subject = tag.marker;
        }

        if subject.kind == SymbolKind::Invalid {
            if !self.add_with_artificial_variable(&row)? {
                return Err(SolverError::UnsatisfiableConstraint);
            }
        } else {
            row.solve_for(subject);
            self.substitute(subject, &row);
            self.rows.insert(subject, row);
        }

        self.optimize(Objective::Main)?;
        Ok(tag)
    }

    /// Remove a constraint and re-optimize.
    pub fn remove_constraint(&mut self, id: SolverConstraintId) -> Result<(), SolverError> {
        let held = self
            .constraints
            .shift_remove(&id)
            .ok_or(SolverError::UnknownConstraint)?;

        self.remove_marker_effects(held.tag.marker, held.strength);
        self.remove_marker_effects(held.tag.other, held.strength);

        if self.rows.swap_remove(&held.tag.marker).is_none() {
            let leaving = self
                .marker_leaving_row(held.tag.marker)
                .ok_or(SolverError::Internal("failed to find leaving row"))?;
            let mut row = self
                .rows
                .swap_remove(&leaving)
                .ok_or(SolverError::Internal("leaving row vanished"))?;
            row.solve_for_pair(leaving, held.tag.marker);
            self.substitute(held.tag.marker, &row);
        }

        self.optimize(Objective::Main)
    }

    fn new_symbol(&mut self, kind: SymbolKind) -> Symbol {
        self.symbol_counter += 1;
        Symbol {
            id: self.symbol_counter,
            kind,
        }
    }

    fn create_row(&mut self, constraint: &LinearConstraint) -> (Row, Tag) {
        let expr = &constraint.expression;
        let mut row = Row::new(expr.constant);

        for term in &expr.terms {
            if near_zero(term.coefficient) {
                continue;
            }
            let Some(&symbol) = self.variables.get(term.variable.0) else {
                continue;
            };
            match self.rows.get(&symbol) {
                Some(basic) => row.insert_row(basic, term.coefficient),
                None => row.insert_symbol(symbol, term.coefficient),
            }
        }

        let mut tag = Tag {
            marker: Symbol::INVALID,
            other: Symbol::INVALID,
        };
        let strength = constraint.strength;

        match constraint.relation {
            Relation::LessThanOrEqual | Relation::GreaterThanOrEqual => {
                let coefficient = if constraint.relation == Relation::LessThanOrEqual {
                    1.0
                } else {
                    -1.0
                };
                let slack = self.new_symbol(SymbolKind::Slack);
                tag.marker = slack;
                row.insert_symbol(slack, coefficient);
                if !strength.is_required() {
                    let error = self.new_symbol(SymbolKind::Error);
                    tag.other = error;
                    row.insert_symbol(error, -coefficient);
                    self.objective.insert_symbol(error, strength.0);
                }
            }
            Relation::Equal => {
                if strength.is_required() {
                    let dummy = self.new_symbol(SymbolKind::Dummy);
                    tag.marker = dummy;
                    row.insert_symbol(dummy, 1.0);
                } else {
                    let plus = self.new_symbol(SymbolKind::Error);
                    let minus = self.new_symbol(SymbolKind::Error);
                    tag.marker = plus;
                    tag.other = minus;
                    row.insert_symbol(plus, -1.0);
                    row.insert_symbol(minus, 1.0);
                    self.objective.insert_symbol(plus, strength.0);
                    self.objective.insert_symbol(minus, strength.0);
                }
            }
        }

        if row.constant < 0.0 {
            row.reverse_sign();
        }

        (row, tag)
    }

    /// Pick the basic symbol for a new row: an external symbol if any, else
    /// a pivotable marker with a negative coefficient.
    fn choose_subject(row: &Row, tag: &Tag) -> Symbol {
        if let Some(&symbol) = row.cells.keys().find(|s| s.kind == SymbolKind::External) {
            return symbol;
        }
        if tag.marker.is_pivotable() && row.coefficient(tag.marker) < 0.0 {
            return tag.marker;
        }
        if tag.other.is_pivotable() && row.coefficient(tag.other) < 0.0 {
            return tag.other;
        }
        Symbol::INVALID
    }

    fn all_dummies(row: &Row) -> bool {
        row.cells.keys().all(|s| s.kind == SymbolKind::Dummy)
    }

    /// Phase one of the two-phase simplex: drive a temporary artificial
    /// variable to zero. Returns whether the row is satisfiable.
    fn add_with_artificial_variable(&mut self, row: &Row) -> Result<bool, SolverError> {
        let art = self.new_symbol(SymbolKind::Slack);
        self.rows.insert(art, row.clone());
        self.artificial = Some(row.clone());

        self.optimize(Objective::Artificial)?;
        let success = self
            .artificial
            .take()
            .map(|objective| near_zero(objective.constant))
            .unwrap_or(false);

        if let Some(mut art_row) = self.rows.swap_remove(&art) {
            if art_row.cells.is_empty() {
                return Ok(success);
            }
            let Some(&entering) = art_row.cells.keys().find(|s| s.is_pivotable()) else {
                return Ok(false);
            };
            art_row.solve_for_pair(art, entering);
            self.substitute(entering, &art_row);
            self.rows.insert(entering, art_row);
        }

        for row in self.rows.values_mut() {
            row.remove(art);
        }
        self.objective.remove(art);
        Ok(success)
    }

    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        for basic in self.rows.values_mut() {
            basic.substitute(symbol, row);
        }
        self.objective.substitute(symbol, row);
        if let Some(artificial) = self.artificial.as_mut() {
            artificial.substitute(symbol, row);
        }
    }

    fn objective_row(&self, objective: Objective) -> Option<&Row> {
        match objective {
            Objective::Main => Some(&self.objective),
            Objective::Artificial => self.artificial.as_ref(),
        }
    }

    /// Primal simplex on the chosen objective.
    fn optimize(&mut self, objective: Objective) -> Result<(), SolverError> {
        loop {
            let entering = self.objective_row(objective).and_then(|row| {
                row.cells
                    .iter()
                    .find(|(s, c)| s.kind != SymbolKind::Dummy && **c < 0.0)
                    .map(|(&s, _)| s)
            });
            let Some(entering) = entering else {
                return Ok(());
            };

            let leaving = self
                .leaving_row(entering)
                .ok_or(SolverError::Internal("objective is unbounded"))?;
            let mut row = self
                .rows
                .swap_remove(&leaving)
                .ok_or(SolverError::Internal("leaving row vanished"))?;
            row.solve_for_pair(leaving, entering);
            self.substitute(entering, &row);
            self.rows.insert(entering, row);
        }
    }

    /// Minimum-ratio test for the entering symbol.
    fn leaving_row(&self, entering: Symbol) -> Option<Symbol> {
        let mut ratio = f64::MAX;
        let mut found = None;
        for (&symbol, row) in &self.rows {
            if symbol.kind == SymbolKind::External {
                continue;
            }
            let coefficient = row.coefficient(entering);
            if coefficient < 0.0 {
                let r = -row.constant / coefficient;
                if r < ratio {
                    ratio = r;
                    found = Some(symbol);
                }
            }
        }
        found
    }

    /// Row to pivot on when removing a constraint whose marker is not basic.
    fn marker_leaving_row(&self, marker: Symbol) -> Option<Symbol> {
        let mut r1 = f64::MAX;
        let mut r2 = f64::MAX;
        let mut first = None;
        let mut second = None;
        let mut third = None;
        for (&symbol, row) in &self.rows {
            let c = row.coefficient(marker);
            if c == 0.0 {
                continue;
            }
            if symbol.kind == SymbolKind::External {
                third = Some(symbol);
            } else if c < 0.0 {
                let r = -row.constant / c;
                if r < r1 {
                    r1 = r;
                    first = Some(symbol);
                }
            } else {
                let r = row.constant / c;
                if r < r2 {
                    r2 = r;
                    second = Some(symbol);
                }
            }
        }
        first.or(second).or(third)
    }

    fn remove_marker_effects(&mut self, marker: Symbol, strength: Strength) {
        if marker.kind != SymbolKind::Error {
            return;
        }
        match self.rows.get(&marker) {
            Some(row) => self.objective.insert_row(row, -strength.0),
            None => self.objective.insert_symbol(marker, -strength.0),
        }
    }
}
