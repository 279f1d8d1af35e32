/// 最小堆队列
///
/// 基于 Vec 的二叉最小堆。允许按下标修改元素，修改后由调用方调用
/// `reheapify` 恢复堆序。下标有效性由调用方保证，越界会 panic。

#[derive(Debug, Clone, Default)]
pub struct MinQueue<T: Ord> {
    heap: Vec<T>,
}

impl<T: Ord> MinQueue<T> {
    pub fn new() -> Self {
        Self { heap: Vec::new() }
    }

    /// 从已有元素建堆
    pub fn from_vec(items: Vec<T>) -> Self {
        let mut queue = Self { heap: items };
        let len = queue.heap.len();
        for pos in (0..len / 2).rev() {
            queue.sift_down(pos);
        }
        queue
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// 查看最小元素
    pub fn peek_min(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn push(&mut self, item: T) {
        self.heap.push(item);
        let last = self.heap.len() - 1;
        self.sift_up(last);
    }

    /// 弹出最小元素
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let item = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(item)
    }

    pub fn get(&self, pos: usize) -> &T {
        &self.heap[pos]
    }

    /// 取得可变引用；修改后必须调用 `reheapify(pos)`
    pub fn get_mut(&mut self, pos: usize) -> &mut T {
        &mut self.heap[pos]
    }

    /// 替换指定位置的元素并恢复堆序
    pub fn set(&mut self, pos: usize, item: T) {
        self.heap[pos] = item;
        self.reheapify(pos);
    }

    /// 在外部修改 `pos` 处元素后恢复堆序
    pub fn reheapify(&mut self, pos: usize) {
        assert!(pos < self.heap.len(), "MinQueue index {} out of range", pos);
        let pos = self.sift_up(pos);
        self.sift_down(pos);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.heap.iter()
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.heap[pos] >= self.heap[parent] {
                break;
            }
            self.heap.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.heap[right] < self.heap[left] {
                right
            } else {
                left
            };
            if self.heap[pos] <= self.heap[child] {
                break;
            }
            self.heap.swap(pos, child);
            pos = child;
        }
    }
}

impl<'a, T: Ord> IntoIterator for &'a MinQueue<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T: Ord>(mut queue: MinQueue<T>) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(item) = queue.pop() {
            out.push(item);
        }
        out
    }

    #[test]
    fn test_heapify_and_pop_order() {
        let queue = MinQueue::from_vec(vec![5, 3, 8, 1, 9, 2]);
        assert_eq!(queue.peek_min(), Some(&1));
        assert_eq!(drain(queue), vec![1, 2, 3, 5, 8, 9]);
    }

    #[test]
    fn test_push_pop() {
        let mut queue = MinQueue::new();
        assert!(queue.pop().is_none());
        queue.push(4);
        queue.push(2);
        queue.push(7);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.peek_min(), Some(&4));
    }

    #[test]
    fn test_reheapify_after_mutation() {
        let mut queue = MinQueue::from_vec(vec![1, 4, 6, 8, 10]);

        // 增大堆顶元素，应下沉
        *queue.get_mut(0) = 9;
        queue.reheapify(0);
        assert_eq!(queue.peek_min(), Some(&4));

        // 减小叶子元素，应上浮
        let pos = queue.iter().position(|v| *v == 10).unwrap();
        queue.set(pos, 0);
        assert_eq!(queue.peek_min(), Some(&0));

        assert_eq!(drain(queue), vec![0, 4, 6, 8, 9]);
    }

    #[test]
    #[should_panic]
    fn test_reheapify_out_of_range() {
        let mut queue = MinQueue::from_vec(vec![1]);
        queue.reheapify(3);
    }
}
