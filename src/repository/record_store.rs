// ==========================================
// 缝制线生产跟踪系统 - 记录存储契约
// ==========================================
// 职责: 员工/投入/产出三类记录的统一存储接口
// 契约:
// - list_all: 按插入顺序返回全部记录（无记录时为空）
// - upsert: 同ID存在则整体替换（位置不变），否则追加；返回前已持久化
// - delete_by_id: 删除匹配ID的记录；不存在时不报错
// 并发: 最后写入者生效（无乐观锁）
// ==========================================

use crate::domain::{Employee, InputRecord, OutputRecord, RecordKind};
use crate::repository::error::RepositoryResult;

/// 可存储记录：提供唯一ID与记录类型
pub trait StoredRecord: Clone + Send + Sync + 'static {
    const KIND: RecordKind;

    fn record_id(&self) -> &str;
}

impl StoredRecord for Employee {
    const KIND: RecordKind = RecordKind::Employee;

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl StoredRecord for InputRecord {
    const KIND: RecordKind = RecordKind::Input;

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl StoredRecord for OutputRecord {
    const KIND: RecordKind = RecordKind::Output;

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// 记录存储
pub trait RecordStore<T: StoredRecord>: Send + Sync {
    /// 按插入顺序列出全部记录
    fn list_all(&self) -> RepositoryResult<Vec<T>>;

    /// 按ID整体替换或追加
    fn upsert(&self, record: &T) -> RepositoryResult<()>;

    /// 按ID删除（不存在时为 no-op）
    fn delete_by_id(&self, id: &str) -> RepositoryResult<()>;

    /// 按ID查询
    fn find_by_id(&self, id: &str) -> RepositoryResult<Option<T>> {
        Ok(self.list_all()?.into_iter().find(|r| r.record_id() == id))
    }

    /// 是否为空
    fn is_empty(&self) -> RepositoryResult<bool> {
        Ok(self.list_all()?.is_empty())
    }
}
