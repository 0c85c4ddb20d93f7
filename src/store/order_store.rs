// ==========================================
// 打包运营工作台 - 订单仓储
// ==========================================
// 职责: 订单集合的唯一持有者;变更、查询、统计与变更通知
// 红线: 集合私有,对外只给克隆/视图;每次变更先持久化再通知
// 说明: 不做状态机校验,任意状态转换均允许(人工纠错需要)
// ==========================================

use crate::domain::order::{OrderPatch, PackingOrder};
use crate::domain::query::{
    OrderFilters, OrderPage, OrderSort, OrderStats, UniqueField,
};
use crate::domain::types::{OrderStatus, SortDirection};
use crate::store::state_store::{StateStore, ORDERS_SLOT, UPDATED_AT_SLOT};
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// 订阅凭据,用于退订
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn() + Send>;

// ==========================================
// OrderStore - 订单仓储
// ==========================================
pub struct OrderStore {
    backend: Box<dyn StateStore>,
    orders: Vec<PackingOrder>,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

impl OrderStore {
    /// 以注入的持久化后端构建,并装载已有快照
    ///
    /// # 说明
    /// - 快照损坏(JSON 解析失败)时记录告警并回退为空集合,不让构建失败
    pub fn new(backend: Box<dyn StateStore>) -> Self {
        let orders = Self::load_snapshot(backend.as_ref());
        Self {
            backend,
            orders,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// 纯内存后端(测试用)
    pub fn in_memory() -> Self {
        Self::new(Box::new(crate::store::state_store::MemoryStateStore::new()))
    }

    fn load_snapshot(backend: &dyn StateStore) -> Vec<PackingOrder> {
        match backend.get(ORDERS_SLOT) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<PackingOrder>>(&json) {
                Ok(orders) => {
                    debug!(count = orders.len(), "订单快照装载完成");
                    orders
                }
                Err(e) => {
                    warn!(error = %e, "订单快照损坏,回退为空集合");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "订单快照读取失败,回退为空集合");
                Vec::new()
            }
        }
    }

    /// 每次变更后调用: 全量序列化写入槽位,随后通知订阅者
    ///
    /// # 说明
    /// - 持久化失败只告警不中断(内存态仍是权威,下次变更重试写入)
    fn persist_and_notify(&mut self) {
        match serde_json::to_string(&self.orders) {
            Ok(json) => {
                if let Err(e) = self.backend.put(ORDERS_SLOT, &json) {
                    warn!(error = %e, "订单快照写入失败");
                }
                if let Err(e) = self
                    .backend
                    .put(UPDATED_AT_SLOT, &Utc::now().to_rfc3339())
                {
                    warn!(error = %e, "更新时间写入失败");
                }
            }
            Err(e) => warn!(error = %e, "订单快照序列化失败"),
        }

        for (_, listener) in &self.listeners {
            listener();
        }
    }

    // ==========================================
    // 变更操作
    // ==========================================

    /// 整体替换集合
    pub fn set_orders(&mut self, orders: Vec<PackingOrder>) {
        self.orders = orders;
        self.persist_and_notify();
    }

    /// 追加一批订单(增量导入)
    pub fn add_orders(&mut self, orders: Vec<PackingOrder>) {
        self.orders.extend(orders);
        self.persist_and_notify();
    }

    /// 按 id 合并部分字段;id 不存在时静默无操作(不通知)
    ///
    /// # 说明
    /// - main_photo / polaroids 被改动后重算派生字段
    /// - 状态补丁为 packed 时同样盖打包时间戳,与 update_order_status 口径一致
    pub fn update_order(&mut self, id: &str, patch: OrderPatch) -> bool {
        let Some(order) = self.orders.iter_mut().find(|o| o.id == id) else {
            return false;
        };

        let becomes_packed = patch.status == Some(OrderStatus::Packed);

        if let Some(v) = patch.order_number {
            order.order_number = Some(v);
        }
        if let Some(v) = patch.product_name {
            order.product_name = Some(v);
        }
        if let Some(v) = patch.variant {
            order.variant = Some(v);
        }
        if let Some(v) = patch.color {
            order.color = Some(v);
        }
        if let Some(v) = patch.sku {
            order.sku = Some(v);
        }
        if let Some(v) = patch.quantity {
            order.quantity = v;
        }
        if let Some(v) = patch.customer {
            order.customer = Some(v);
        }
        if let Some(v) = patch.notes {
            order.notes = Some(v);
        }
        if let Some(v) = patch.main_photo {
            order.main_photo = Some(v);
        }
        if let Some(v) = patch.polaroids {
            order.polaroids = v;
        }
        if let Some(v) = patch.back_engraving_type {
            order.back_engraving_type = Some(v);
        }
        if let Some(v) = patch.back_engraving_value {
            order.back_engraving_value = Some(v);
        }
        if let Some(v) = patch.status {
            order.status = v;
        }
        if let Some(v) = patch.packer {
            order.packer = Some(v);
        }

        if becomes_packed {
            order.packed_at = Some(Utc::now());
        }

        order.recompute_derived();
        self.persist_and_notify();
        true
    }

    /// 状态转换便捷入口
    ///
    /// # 副作用
    /// - 置为 packed: 盖打包时间戳,packer 给了就记录
    /// - 离开 packed: 不清除时间戳与打包人(保留痕迹,下次 packed 覆盖)
    /// - 同状态重复调用也通知(调用方依赖通知刷新)
    pub fn update_order_status(
        &mut self,
        id: &str,
        status: OrderStatus,
        packer: Option<&str>,
    ) -> bool {
        let Some(order) = self.orders.iter_mut().find(|o| o.id == id) else {
            return false;
        };

        order.status = status;
        if status == OrderStatus::Packed {
            order.packed_at = Some(Utc::now());
            if let Some(p) = packer {
                order.packer = Some(p.to_string());
            }
        }

        self.persist_and_notify();
        true
    }

    /// 批量状态转换;未知 id 逐条跳过,不整批中止
    ///
    /// # 返回
    /// - 实际更新的条数
    pub fn bulk_update_status(
        &mut self,
        ids: &[String],
        status: OrderStatus,
        packer: Option<&str>,
    ) -> usize {
        let mut updated = 0;
        for id in ids {
            if self.update_order_status(id, status, packer) {
                updated += 1;
            }
        }
        updated
    }

    /// 删除单条;id 不存在时静默无操作
    pub fn delete_order(&mut self, id: &str) -> bool {
        let before = self.orders.len();
        self.orders.retain(|o| o.id != id);
        if self.orders.len() == before {
            return false;
        }
        self.persist_and_notify();
        true
    }

    /// 清空集合
    pub fn clear_all_orders(&mut self) {
        self.orders.clear();
        self.persist_and_notify();
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 过滤 + 排序 + 分页视图
    ///
    /// # 说明
    /// - 过滤为全条件合取;精确过滤值为 "all" 时视为不限
    /// - 排序字段缺失的记录恒排在有值记录之后,与方向无关
    /// - 页码 1 起;超出范围返回空页(total 不变)
    pub fn get_orders(
        &self,
        filters: &OrderFilters,
        sort: Option<OrderSort>,
        page: usize,
        page_size: usize,
    ) -> OrderPage {
        let mut filtered: Vec<PackingOrder> = self
            .orders
            .iter()
            .filter(|o| Self::matches_filters(o, filters))
            .cloned()
            .collect();

        if let Some(sort) = sort {
            filtered.sort_by(|a, b| Self::compare_orders(a, b, sort));
        }

        let total = filtered.len();
        let page_size = page_size.max(1);
        let page = page.max(1);
        let total_pages = (total + page_size - 1) / page_size;

        let start = (page - 1) * page_size;
        let orders = if start >= total {
            Vec::new()
        } else {
            filtered[start..(start + page_size).min(total)].to_vec()
        };

        OrderPage {
            orders,
            total,
            total_pages,
            current_page: page,
            page_size,
        }
    }

    fn matches_filters(order: &PackingOrder, filters: &OrderFilters) -> bool {
        // 子串搜索(不区分大小写)
        if let Some(query) = &filters.search {
            let query = query.trim().to_lowercase();
            if !query.is_empty() {
                let hit = [
                    order.order_number.as_deref(),
                    order.product_name.as_deref(),
                    order.variant.as_deref(),
                    order.customer.as_deref(),
                    order.sku.as_deref(),
                ]
                .iter()
                .any(|field| {
                    field
                        .map(|v| v.to_lowercase().contains(&query))
                        .unwrap_or(false)
                });
                if !hit {
                    return false;
                }
            }
        }

        // 精确匹配(哨兵值 "all" 不限)
        if OrderFilters::is_active(&filters.status) {
            if Some(order.status.as_str()) != filters.status.as_deref() {
                return false;
            }
        }
        if OrderFilters::is_active(&filters.packer) {
            if order.packer.as_deref() != filters.packer.as_deref() {
                return false;
            }
        }
        if OrderFilters::is_active(&filters.sku) {
            if order.sku.as_deref() != filters.sku.as_deref() {
                return false;
            }
        }
        if OrderFilters::is_active(&filters.variant) {
            if order.variant.as_deref() != filters.variant.as_deref() {
                return false;
            }
        }

        true
    }

    fn compare_orders(a: &PackingOrder, b: &PackingOrder, sort: OrderSort) -> Ordering {
        match (sort.field.value_of(a), sort.field.value_of(b)) {
            (Some(va), Some(vb)) => {
                let ord = va.compare(&vb);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
            // 缺失值恒排在有值之后,方向只翻转有值间的比较
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// 全量集合(只读克隆)
    pub fn get_all_orders(&self) -> Vec<PackingOrder> {
        self.orders.clone()
    }

    /// 某字段的去重取值,按字母序,排除空白
    pub fn get_unique_values(&self, field: UniqueField) -> Vec<String> {
        let values: BTreeSet<String> = self
            .orders
            .iter()
            .filter_map(|o| field.value_of(o))
            .filter(|v| !v.trim().is_empty())
            .collect();
        values.into_iter().collect()
    }

    /// 全集合状态统计
    pub fn get_stats(&self) -> OrderStats {
        OrderStats::from_orders(&self.orders)
    }

    /// 对给定列表的状态统计(过滤后视图用)
    pub fn get_filtered_stats(orders: &[PackingOrder]) -> OrderStats {
        OrderStats::from_orders(orders)
    }

    // ==========================================
    // 变更订阅
    // ==========================================

    /// 注册变更回调: 每次变更操作完成后触发,无载荷
    ///
    /// # 说明
    /// - 多个订阅者之间无触发顺序保证
    /// - 连续 N 次变更触发 N 次通知,不去重
    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        ListenerId(id)
    }

    /// 退订;未知凭据静默无操作
    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id.0);
    }
}
