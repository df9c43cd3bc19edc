//! Odometer over dataset coordinates with a custom digit order and some
//! digits held fixed.

/// Iterator over coordinate tuples.
///
/// `order` lists dimension positions from slowest to fastest varying;
/// positions in `fixed` never move. With the natural order and nothing
/// fixed, the tuples come out in flat offset order.
#[derive(Debug, Clone)]
pub struct Walk {
    sizes: Vec<usize>,
    free: Vec<usize>,
    coords: Vec<usize>,
    done: bool,
}

impl Walk {
    pub fn new(sizes: Vec<usize>, order: &[usize], fixed: &[(usize, usize)]) -> Self {
        let mut coords = vec![0; sizes.len()];
        let mut is_fixed = vec![false; sizes.len()];
        for &(dim, pos) in fixed {
            coords[dim] = pos;
            is_fixed[dim] = true;
        }

        let free: Vec<usize> = order.iter().copied().filter(|&dim| !is_fixed[dim]).collect();
        let done = free.iter().any(|&dim| sizes[dim] == 0);

        Walk {
            sizes,
            free,
            coords,
            done,
        }
    }

    /// Walk every coordinate in flat offset order
    pub fn natural(sizes: Vec<usize>) -> Self {
        let order: Vec<usize> = (0..sizes.len()).collect();
        Self::new(sizes, &order, &[])
    }
}

impl Iterator for Walk {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.coords.clone();

        let mut advanced = false;
        for &dim in self.free.iter().rev() {
            self.coords[dim] += 1;
            if self.coords[dim] < self.sizes[dim] {
                advanced = true;
                break;
            }
            self.coords[dim] = 0;
        }
        if !advanced {
            self.done = true;
        }

        Some(current)
    }
}
