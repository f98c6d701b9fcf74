// ==========================================
// 缝制线生产跟踪系统 - 内存记录存储
// ==========================================
// 用途: 单元测试 / 嵌入场景，无需真实数据库
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::{RecordStore, StoredRecord};
use std::sync::{Mutex, MutexGuard};

/// 内存记录存储（Vec 保持插入顺序）
pub struct InMemoryRecordStore<T: StoredRecord> {
    records: Mutex<Vec<T>>,
}

impl<T: StoredRecord> InMemoryRecordStore<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// 以已有记录初始化
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Vec<T>>> {
        self.records
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl<T: StoredRecord> Default for InMemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoredRecord> RecordStore<T> for InMemoryRecordStore<T> {
    fn list_all(&self) -> RepositoryResult<Vec<T>> {
        Ok(self.lock()?.clone())
    }

    fn upsert(&self, record: &T) -> RepositoryResult<()> {
        let mut records = self.lock()?;
        match records
            .iter_mut()
            .find(|r| r.record_id() == record.record_id())
        {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    fn delete_by_id(&self, id: &str) -> RepositoryResult<()> {
        self.lock()?.retain(|r| r.record_id() != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Employee;

    fn employee(id: &str, name: &str) -> Employee {
        let mut emp = Employee::with_id(id);
        emp.name = name.to_string();
        emp
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let store = InMemoryRecordStore::<Employee>::new();
        store.upsert(&employee("EMP001", "John")).unwrap();
        store.upsert(&employee("EMP002", "Jane")).unwrap();
        store.upsert(&employee("EMP001", "John Doe")).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "EMP001");
        assert_eq!(all[0].name, "John Doe");
        assert_eq!(all[1].id, "EMP002");
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let store = InMemoryRecordStore::with_records(vec![employee("EMP001", "John")]);
        store.delete_by_id("EMP999").unwrap();
        assert_eq!(store.list_all().unwrap().len(), 1);

        store.delete_by_id("EMP001").unwrap();
        assert!(store.is_empty().unwrap());
        assert!(store.find_by_id("EMP001").unwrap().is_none());
    }
}
