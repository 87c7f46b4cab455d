//! Blocks of vertically aligned port slots and their compaction.
//!
//! Slots are dense indices into one pass's port table. A block is a chain of slots linked through
//! `align`, one per row, whose last member points back to the root. Blocks are grouped into
//! classes identified by a sink; shifts between classes are collected while placing and resolved
//! once every block has a local coordinate.

use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone)]
pub struct BlockForest {
    root: Vec<usize>,
    align: Vec<usize>,
    sink: Vec<usize>,
    /// Pending class shifts, indexed by sink: `shifts[a][b]` bounds how far class `b` may sit
    /// relative to class `a`.
    shifts: Vec<HashMap<usize, f64>>,
    x: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unplaced,
    Placing,
    Placed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Resolve {
    Pending,
    Resolving,
    Done(f64),
}

impl BlockForest {
    pub fn new(slots: usize) -> Self {
        Self {
            root: (0..slots).collect(),
            align: (0..slots).collect(),
            sink: (0..slots).collect(),
            shifts: vec![HashMap::default(); slots],
            x: vec![0.0; slots],
        }
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn root(&self, slot: usize) -> usize {
        self.root[slot]
    }

    /// Next member of the block below `slot`; the bottom member yields the root.
    pub fn next(&self, slot: usize) -> usize {
        self.align[slot]
    }

    pub fn is_block_bottom(&self, slot: usize) -> bool {
        self.align[slot] == self.root[slot]
    }

    pub fn is_unaligned(&self, slot: usize) -> bool {
        self.root[slot] == slot && self.align[slot] == slot
    }

    /// Appends `lower` (a singleton) below `upper` (a block bottom).
    pub fn align(&mut self, upper: usize, lower: usize) {
        debug_assert!(self.is_block_bottom(upper) && self.is_unaligned(lower));
        let r = self.root[upper];
        self.align[upper] = lower;
        self.root[lower] = r;
        self.align[lower] = r;
    }

    /// Members of the block rooted at `root`, top to bottom.
    pub fn members(&self, root: usize) -> Vec<usize> {
        let mut out = vec![root];
        let mut w = self.align[root];
        while w != root {
            out.push(w);
            w = self.align[w];
        }
        out
    }

    /// Local coordinates for every block, then global coordinates for every slot.
    ///
    /// `rows` lists slots left to right; `sep(left, right)` is the minimum distance between two
    /// neighbours of a row.
    pub fn compact<S>(&mut self, rows: &[Vec<usize>], sep: S) -> Vec<f64>
    where
        S: Fn(usize, usize) -> f64,
    {
        let mut pred: Vec<usize> = (0..self.len()).collect();
        for row in rows {
            for pair in row.windows(2) {
                pred[pair[1]] = pair[0];
            }
        }

        let mut visit = vec![Visit::Unplaced; self.len()];
        for row in rows {
            for &v in row {
                if self.root[v] == v && visit[v] == Visit::Unplaced {
                    self.place_block(v, &pred, &sep, &mut visit);
                }
            }
        }

        let offsets = self.resolve_shifts();
        (0..self.len())
            .map(|slot| {
                let r = self.root[slot];
                let x = self.x[r] + offsets[self.sink[r]];
                assert!(x.is_finite(), "slot {slot} got non-finite coordinate {x}");
                x
            })
            .collect()
    }

    fn place_block<S>(&mut self, start: usize, pred: &[usize], sep: &S, visit: &mut [Visit])
    where
        S: Fn(usize, usize) -> f64,
    {
        // (block root, member currently being examined)
        let mut stack: Vec<(usize, usize)> = Vec::new();
        visit[start] = Visit::Placing;
        self.x[start] = 0.0;
        stack.push((start, start));

        while let Some(&(v, w)) = stack.last() {
            let p = pred[w];
            if p != w {
                let u = self.root[p];
                match visit[u] {
                    Visit::Unplaced => {
                        visit[u] = Visit::Placing;
                        self.x[u] = 0.0;
                        stack.push((u, u));
                        continue;
                    }
                    Visit::Placing => panic!("block placement found a cycle through slot {u}"),
                    Visit::Placed => self.constrain(v, u, sep(p, w)),
                }
            }

            let next = self.align[w];
            if next == v {
                visit[v] = Visit::Placed;
                stack.pop();
            } else if let Some(top) = stack.last_mut() {
                top.1 = next;
            }
        }
    }

    /// Block `v` has block `u` as its left neighbour at distance `gap`.
    fn constrain(&mut self, v: usize, u: usize, gap: f64) {
        if self.sink[v] == v {
            self.sink[v] = self.sink[u];
        }
        let (sv, su) = (self.sink[v], self.sink[u]);
        if sv != su {
            let amount = self.x[v] - self.x[u] - gap;
            self.shifts[su]
                .entry(sv)
                .and_modify(|s| *s = s.min(amount))
                .or_insert(amount);
        } else {
            self.x[v] = self.x[v].max(self.x[u] + gap);
        }
    }

    /// Offset of each class: the smallest pending shift plus the offset of the class it points
    /// at, or zero for a class without pending shifts.
    fn resolve_shifts(&self) -> Vec<f64> {
        let n = self.len();
        let mut state = vec![Resolve::Pending; n];

        for start in 0..n {
            if self.sink[start] != start || state[start] != Resolve::Pending {
                continue;
            }
            let mut stack: Vec<(usize, bool)> = vec![(start, false)];
            while let Some((class, expanded)) = stack.pop() {
                if expanded {
                    let offset = self.shifts[class]
                        .iter()
                        .map(|(&other, &amount)| match state[other] {
                            Resolve::Done(o) => amount + o,
                            _ => unreachable!("class {other} resolved out of order"),
                        })
                        .reduce(f64::min)
                        .unwrap_or(0.0);
                    state[class] = Resolve::Done(offset);
                    continue;
                }
                match state[class] {
                    Resolve::Done(_) => continue,
                    Resolve::Resolving => panic!("class shifts form a cycle through {class}"),
                    Resolve::Pending => {}
                }
                state[class] = Resolve::Resolving;
                stack.push((class, true));
                for &other in self.shifts[class].keys() {
                    match state[other] {
                        Resolve::Pending => stack.push((other, false)),
                        Resolve::Resolving => {
                            panic!("class shifts form a cycle through {other}")
                        }
                        Resolve::Done(_) => {}
                    }
                }
            }
        }

        state
            .into_iter()
            .map(|s| match s {
                Resolve::Done(o) => o,
                _ => 0.0,
            })
            .collect()
    }
}
