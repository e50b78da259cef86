//! Curated set of very common simplified-Chinese words.
//!
//! Membership decides `commonPriority` during ranking: an everyday word beats
//! an obscure homograph for the same English key no matter how its glosses
//! compare. The list is a frequency-derived editorial set, not exhaustive.

static COMMON_WORDS: &[&str] = &[
    "一", "上", "下", "不", "东西", "个", "中", "中国", "为什么", "也",
    "书", "了", "事", "人", "什么", "今天", "他", "他们", "你", "你们",
    "做", "先生", "八", "六", "再见", "出", "分", "别", "到", "力",
    "办法", "动", "十", "去", "又", "只", "叫", "可以", "吃", "同",
    "名字", "后", "吗", "听", "呢", "和", "喜欢", "喝", "四", "回",
    "因为", "国", "在", "地方", "坐", "大", "天", "太", "女", "她",
    "好", "妈妈", "孩子", "学", "学习", "学生", "家", "对", "小", "就",
    "山", "工作", "年", "开", "很", "得", "心", "想", "意思", "我",
    "我们", "手", "打", "把", "拿", "放", "文", "新", "日", "时候",
    "时间", "明天", "昨天", "是", "月", "朋友", "来", "东", "没有", "火",
    "点", "爱", "爸爸", "猫", "现在", "狗", "玩", "生", "用", "电",
    "白", "看", "知道", "老师", "能", "花", "行", "西", "要", "见",
    "觉得", "说", "说话", "谁", "谢谢", "走", "起", "路", "车", "这",
    "进", "道", "那", "都", "钱", "门", "问", "问题", "间", "雨",
    "零", "面", "高", "马",
];

/// Whether the entry's simplified form is in the curated common-word set.
pub fn is_common(simplified: &str) -> bool {
    COMMON_WORDS.contains(&simplified)
}
